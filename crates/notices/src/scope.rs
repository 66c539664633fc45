use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use herald_queue::Queue;

use crate::digest::{self, DigestFn, TitleFormat};
use crate::notice::{AutoDismiss, Notice};
use crate::registry::Registry;
use crate::render::{Alert, AlertRenderer, CloseHandle};

/// Lifecycle state of a mounted scope's display slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	/// Controller not running, or torn down.
	#[default]
	Idle,
	/// A queue wait is outstanding.
	Awaiting,
	/// A digested notice occupies the display slot.
	Displaying,
}

#[derive(Default)]
struct Overrides {
	title_format: Option<TitleFormat>,
	digest: Option<DigestFn>,
	renderer: Option<Arc<dyn AlertRenderer>>,
	auto_dismiss: Option<AutoDismiss>,
	default_message: Option<String>,
}

struct ScopeShared {
	queue: Queue<Notice>,
	registry: Registry,
	overrides: Overrides,
	current: Mutex<Option<Notice>>,
	dismiss: Mutex<Option<CancellationToken>>,
	phase: Mutex<Phase>,
}

impl ScopeShared {
	fn accept(&self, notice: Notice) {
		tracing::trace!(queued = self.queue.len(), "notice.accept");
		self.queue.accept(notice);
	}

	// Scope override first, else the registry slot (itself builtin-backed).
	fn title_format(&self) -> TitleFormat {
		self.overrides
			.title_format
			.clone()
			.unwrap_or_else(|| self.registry.title_format())
	}

	fn digest_fn(&self) -> DigestFn {
		self.overrides.digest.clone().unwrap_or_else(|| self.registry.digest())
	}

	fn renderer(&self) -> Arc<dyn AlertRenderer> {
		self.overrides.renderer.clone().unwrap_or_else(|| self.registry.renderer())
	}

	fn default_message(&self) -> String {
		self.overrides
			.default_message
			.clone()
			.unwrap_or_else(|| self.registry.default_message())
	}

	fn finalize(&self, notice: Notice) -> Notice {
		let digest_fn = self.digest_fn();
		let title_format = self.title_format();
		let fallback = self.default_message();
		digest::finalize(notice, &digest_fn, &title_format, &fallback, self.overrides.auto_dismiss)
	}

	fn set_phase(&self, phase: Phase) {
		*self.phase.lock() = phase;
	}
}

/// Builder for a mounted [`Scope`].
///
/// Every override is optional; an unset slot resolves through the scope's
/// registry and then the builtins.
#[derive(Default)]
pub struct ScopeBuilder {
	registry: Option<Registry>,
	overrides: Overrides,
}

impl ScopeBuilder {
	/// Uses `registry` instead of the process-wide one.
	pub fn registry(mut self, registry: Registry) -> Self {
		self.registry = Some(registry);
		self
	}

	/// Title formatter for this scope only.
	pub fn title_format(mut self, format: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
		self.overrides.title_format = Some(Arc::new(format));
		self
	}

	/// Digest function for this scope only. Dismissal resolution stays in
	/// the pipeline and runs regardless.
	pub fn digest(mut self, digest: impl Fn(Notice, &TitleFormat, &str) -> Notice + Send + Sync + 'static) -> Self {
		self.overrides.digest = Some(Arc::new(digest));
		self
	}

	/// Renderer for this scope only.
	pub fn renderer(mut self, renderer: impl AlertRenderer + 'static) -> Self {
		self.overrides.renderer = Some(Arc::new(renderer));
		self
	}

	/// Dismissal window applied when a notice carries none.
	pub fn auto_dismiss(mut self, policy: AutoDismiss) -> Self {
		self.overrides.auto_dismiss = Some(policy);
		self
	}

	/// Dismissal window in milliseconds for notices that carry none; `0`
	/// means never dismiss.
	pub fn timeout_ms(mut self, ms: u64) -> Self {
		self.overrides.auto_dismiss = Some(AutoDismiss::from_millis(ms));
		self
	}

	/// Fallback message for this scope only.
	pub fn default_message(mut self, message: impl Into<String>) -> Self {
		self.overrides.default_message = Some(message.into());
		self
	}

	/// Spawns the lifecycle controller and returns the mounted scope.
	pub fn mount(self) -> Scope {
		let shared = Arc::new(ScopeShared {
			queue: Queue::new(),
			registry: self.registry.unwrap_or_else(|| Registry::global().clone()),
			overrides: self.overrides,
			current: Mutex::new(None),
			dismiss: Mutex::new(None),
			phase: Mutex::new(Phase::Idle),
		});
		let shutdown = CancellationToken::new();

		let controller = Controller {
			shared: Arc::clone(&shared),
			shutdown: shutdown.clone(),
		};
		runtime_handle().spawn(controller.run());
		tracing::debug!("scope.mount");

		Scope { shared, shutdown }
	}
}

/// One mounted display context: a queue, resolved configuration, and a
/// controller task driving the single display slot.
///
/// Dropping the scope (or calling [`Scope::shutdown`]) stops the
/// controller, releases any outstanding queue wait, and clears the slot.
pub struct Scope {
	shared: Arc<ScopeShared>,
	shutdown: CancellationToken,
}

impl Scope {
	/// Starts building a scope.
	pub fn builder() -> ScopeBuilder {
		ScopeBuilder::default()
	}

	/// Mounts a scope with no overrides against the process-wide registry.
	pub fn mount() -> Self {
		Self::builder().mount()
	}

	/// Producer handle bound to this scope's queue.
	pub fn sink(&self) -> NoticeSink {
		NoticeSink {
			inner: SinkInner::Mounted(Arc::clone(&self.shared)),
		}
	}

	/// Enqueues a notice for display. Always succeeds.
	pub fn accept(&self, notice: impl Into<Notice>) {
		self.shared.accept(notice.into());
	}

	/// Currently displayed digested notice, if any.
	pub fn current(&self) -> Option<Notice> {
		self.shared.current.lock().clone()
	}

	/// Dismisses the displayed notice. No-op when nothing is displayed;
	/// repeated calls are harmless.
	pub fn close(&self) {
		if let Some(token) = self.shared.dismiss.lock().as_ref() {
			token.cancel();
		}
	}

	/// Notices buffered behind the displayed one.
	pub fn queued_count(&self) -> usize {
		self.shared.queue.len()
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		*self.shared.phase.lock()
	}

	/// Stops the controller. Also runs on drop.
	pub fn shutdown(&self) {
		self.shutdown.cancel();
	}
}

impl Drop for Scope {
	fn drop(&mut self) {
		self.shutdown.cancel();
	}
}

/// Cloneable producer handle.
///
/// A mounted sink feeds its scope's queue. A detached sink has no queue or
/// controller behind it: each accepted notice is digested synchronously
/// and presented immediately through its registry's renderer, so nothing
/// is silently dropped and nothing blocks.
#[derive(Clone)]
pub struct NoticeSink {
	inner: SinkInner,
}

#[derive(Clone)]
enum SinkInner {
	Mounted(Arc<ScopeShared>),
	Detached(Registry),
}

impl NoticeSink {
	/// Detached sink against the process-wide registry.
	pub fn detached() -> Self {
		Self::detached_with(Registry::global().clone())
	}

	/// Detached sink against an explicit registry.
	pub fn detached_with(registry: Registry) -> Self {
		Self {
			inner: SinkInner::Detached(registry),
		}
	}

	/// Delivers a notice. Always succeeds.
	pub fn accept(&self, notice: impl Into<Notice>) {
		let notice = notice.into();
		match &self.inner {
			SinkInner::Mounted(shared) => shared.accept(notice),
			SinkInner::Detached(registry) => present_detached(registry, notice),
		}
	}
}

/// Immediate presentation path for producers with no mounted scope.
fn present_detached(registry: &Registry, notice: Notice) {
	let digest_fn = registry.digest();
	let title_format = registry.title_format();
	let fallback = registry.default_message();
	let notice = digest::finalize(notice, &digest_fn, &title_format, &fallback, None);
	let alert = Alert::new(&notice, CloseHandle::inert(), None);
	tracing::warn!(
		kind = alert.kind().as_str(),
		title = alert.title().unwrap_or_default(),
		message = alert.message(),
		"notice accepted with no mounted scope; presenting immediately"
	);
	registry.renderer().show(alert);
}

fn runtime_handle() -> Handle {
	if let Ok(handle) = Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("herald-scope")
			.build()
			.expect("failed to build herald global tokio runtime")
	});
	runtime.handle().clone()
}

struct Controller {
	shared: Arc<ScopeShared>,
	shutdown: CancellationToken,
}

impl Controller {
	async fn run(self) {
		loop {
			self.shared.set_phase(Phase::Awaiting);
			let notice = tokio::select! {
				biased;
				_ = self.shutdown.cancelled() => break,
				notice = self.shared.queue.next() => notice,
			};
			// A cancelled or superseded wait; go back to waiting.
			let Some(notice) = notice else { continue };

			let notice = self.shared.finalize(notice);
			self.display(notice).await;
			if self.shutdown.is_cancelled() {
				break;
			}
		}
		self.wind_down();
	}

	async fn display(&self, notice: Notice) {
		let auto_dismiss = notice.auto_dismiss.unwrap_or_default();
		let dismiss = CancellationToken::new();
		*self.shared.dismiss.lock() = Some(dismiss.clone());
		*self.shared.current.lock() = Some(notice.clone());
		self.shared.set_phase(Phase::Displaying);

		let renderer = self.shared.renderer();
		let alert = Alert::new(&notice, CloseHandle::new(dismiss.clone()), Some(self.shared.queue.clone()));
		tracing::trace!(kind = alert.kind().as_str(), queued = alert.queued_count(), "notice.show");
		renderer.show(alert);

		match auto_dismiss {
			AutoDismiss::After(window) => {
				tokio::select! {
					_ = tokio::time::sleep(window) => {}
					_ = dismiss.cancelled() => {}
					_ = self.shutdown.cancelled() => {}
				}
			}
			AutoDismiss::Never => {
				tokio::select! {
					_ = dismiss.cancelled() => {}
					_ = self.shutdown.cancelled() => {}
				}
			}
		}

		// One transition out of Displaying: mark the slot closed first so a
		// late close() lands on an already-cancelled token.
		dismiss.cancel();
		*self.shared.dismiss.lock() = None;
		*self.shared.current.lock() = None;
		renderer.clear();
		tracing::trace!("notice.clear");
	}

	fn wind_down(&self) {
		self.shared.queue.cancel_wait();
		*self.shared.dismiss.lock() = None;
		*self.shared.current.lock() = None;
		self.shared.set_phase(Phase::Idle);
		tracing::debug!("scope.unmount");
	}
}
