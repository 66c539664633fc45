use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::digest::{self, DEFAULT_MESSAGE, DigestFn, TitleFormat};
use crate::notice::Notice;
use crate::render::{AlertRenderer, NullRenderer};

struct Slots {
	title_format: TitleFormat,
	digest: DigestFn,
	renderer: Arc<dyn AlertRenderer>,
	default_message: String,
}

impl Slots {
	fn builtin() -> Self {
		Self {
			title_format: Arc::new(digest::title_case),
			digest: Arc::new(digest::digest),
			renderer: Arc::new(NullRenderer),
			default_message: DEFAULT_MESSAGE.to_string(),
		}
	}
}

/// Shared mutable defaults for every scope that does not override them:
/// the title formatter, the digest function, the alert renderer, and the
/// fallback message.
///
/// Cloning yields another handle to the same slots. Scopes constructed
/// without an explicit registry share the process-wide
/// [`Registry::global`]; tests and embedders can build private registries
/// for isolation. Setters replace one slot atomically and never fail; the
/// digest pipeline only ever reads.
#[derive(Clone)]
pub struct Registry {
	slots: Arc<RwLock<Slots>>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Registry {
	/// Creates a registry holding the builtin defaults.
	pub fn new() -> Self {
		Self {
			slots: Arc::new(RwLock::new(Slots::builtin())),
		}
	}

	/// Process-wide registry shared by scopes built without an explicit one.
	pub fn global() -> &'static Registry {
		static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);
		&GLOBAL
	}

	/// Replaces the title formatter.
	pub fn set_title_format(&self, format: impl Fn(&str) -> String + Send + Sync + 'static) {
		tracing::debug!("registry.set_title_format");
		self.slots.write().title_format = Arc::new(format);
	}

	/// Replaces the digest function. Dismissal resolution stays in the
	/// pipeline and runs regardless of the digest installed here.
	pub fn set_digest(&self, digest: impl Fn(Notice, &TitleFormat, &str) -> Notice + Send + Sync + 'static) {
		tracing::debug!("registry.set_digest");
		self.slots.write().digest = Arc::new(digest);
	}

	/// Replaces the alert renderer used by scopes without their own.
	pub fn set_renderer(&self, renderer: impl AlertRenderer + 'static) {
		tracing::debug!("registry.set_renderer");
		self.slots.write().renderer = Arc::new(renderer);
	}

	/// Replaces the fallback message substituted for absent ones.
	pub fn set_default_message(&self, message: impl Into<String>) {
		let message = message.into();
		tracing::debug!(fallback = %message, "registry.set_default_message");
		self.slots.write().default_message = message;
	}

	/// Restores all four slots to the builtin defaults.
	pub fn reset(&self) {
		tracing::debug!("registry.reset");
		*self.slots.write() = Slots::builtin();
	}

	/// Current title formatter.
	pub fn title_format(&self) -> TitleFormat {
		self.slots.read().title_format.clone()
	}

	/// Current digest function.
	pub fn digest(&self) -> DigestFn {
		self.slots.read().digest.clone()
	}

	/// Current alert renderer.
	pub fn renderer(&self) -> Arc<dyn AlertRenderer> {
		self.slots.read().renderer.clone()
	}

	/// Current fallback message.
	pub fn default_message(&self) -> String {
		self.slots.read().default_message.clone()
	}
}

#[cfg(test)]
mod tests {
	use serial_test::serial;

	use super::*;
	use crate::notice::Kind;

	fn digest_with(registry: &Registry, notice: Notice) -> Notice {
		(registry.digest())(notice, &registry.title_format(), &registry.default_message())
	}

	#[test]
	fn setters_change_resolution_and_reset_restores_builtins() {
		let registry = Registry::new();
		registry.set_title_format(|s: &str| s.to_uppercase());
		registry.set_default_message("nothing to say");

		let digested = digest_with(&registry, Notice::builder().title("quiet words").build());
		assert_eq!(digested.title.as_deref(), Some("QUIET WORDS"));
		assert_eq!(digested.message.as_deref(), Some("nothing to say"));

		registry.reset();
		let digested = digest_with(&registry, Notice::builder().title("quiet words").build());
		assert_eq!(digested.title.as_deref(), Some("Quiet Words"));
		assert_eq!(digested.message.as_deref(), Some(DEFAULT_MESSAGE));
	}

	#[test]
	fn custom_digest_slot_is_invoked() {
		let registry = Registry::new();
		registry.set_digest(|mut notice: Notice, _format: &TitleFormat, _fallback: &str| {
			notice.kind = Some(Kind::Info);
			notice
		});
		let digested = digest_with(&registry, Notice::new());
		assert_eq!(digested.kind, Some(Kind::Info));
	}

	#[test]
	fn registries_are_isolated_from_each_other() {
		let left = Registry::new();
		let right = Registry::new();
		left.set_default_message("left side");
		assert_eq!(right.default_message(), DEFAULT_MESSAGE);
	}

	#[test]
	fn clones_share_the_same_slots() {
		let registry = Registry::new();
		let handle = registry.clone();
		handle.set_default_message("shared");
		assert_eq!(registry.default_message(), "shared");
	}

	#[test]
	#[serial]
	fn global_registry_is_process_wide() {
		Registry::global().set_default_message("globally visible");
		assert_eq!(Registry::global().default_message(), "globally visible");
		Registry::global().reset();
		assert_eq!(Registry::global().default_message(), DEFAULT_MESSAGE);
	}
}
