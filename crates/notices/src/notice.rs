use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Category tag for a notice, used by display layers for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
	/// Neutral styling; the canonical default for untagged notices.
	#[default]
	Primary,
	/// An operation completed.
	Success,
	/// Something failed.
	Danger,
	/// Needs attention, not fatal.
	Warning,
	/// Informational.
	Info,
}

impl Kind {
	/// Lowercase identifier used by display styling hooks.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Primary => "primary",
			Self::Success => "success",
			Self::Danger => "danger",
			Self::Warning => "warning",
			Self::Info => "info",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error parsing a notice kind from a string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown notice kind: {0}")]
pub struct KindParseError(pub String);

impl FromStr for Kind {
	type Err = KindParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"primary" => Ok(Self::Primary),
			"success" => Ok(Self::Success),
			"danger" => Ok(Self::Danger),
			"warning" => Ok(Self::Warning),
			"info" => Ok(Self::Info),
			_ => Err(KindParseError(s.to_string())),
		}
	}
}

/// Controls automatic dismissal of a displayed notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoDismiss {
	/// Notice remains visible until manually dismissed.
	Never,
	/// Notice dismisses itself after the given duration.
	After(Duration),
}

impl AutoDismiss {
	/// Fallback dismissal window applied when neither the notice nor its
	/// scope supplies one.
	pub const DEFAULT: Self = Self::After(Duration::from_millis(3000));

	/// Millisecond convention used at producer call sites: `0` means the
	/// notice is never dismissed automatically.
	pub fn from_millis(ms: u64) -> Self {
		if ms == 0 {
			Self::Never
		} else {
			Self::After(Duration::from_millis(ms))
		}
	}
}

impl Default for AutoDismiss {
	fn default() -> Self {
		Self::DEFAULT
	}
}

/// A single transient message awaiting or undergoing display.
///
/// Raw notices may leave any field unset; the digest pipeline resolves
/// every gap before a display layer sees the notice, and marks the result
/// so a second digestion passes it through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notice {
	/// Category tag; filled with [`Kind::default`] during digest when unset.
	pub kind: Option<Kind>,
	/// Optional heading, passed through the active title formatter.
	pub title: Option<String>,
	/// Body text; replaced by the resolved fallback message when unset.
	pub message: Option<String>,
	/// Dismissal policy; resolved during digest when unset.
	pub auto_dismiss: Option<AutoDismiss>,
	digested: bool,
}

impl Notice {
	/// Creates an empty notice; every field resolves during digest.
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts building a notice.
	pub fn builder() -> NoticeBuilder {
		NoticeBuilder::default()
	}

	/// Creates a [`Kind::Primary`] notice with the given message.
	pub fn primary(message: impl Into<String>) -> Self {
		Self::of_kind(Kind::Primary, message)
	}

	/// Creates a [`Kind::Success`] notice with the given message.
	pub fn success(message: impl Into<String>) -> Self {
		Self::of_kind(Kind::Success, message)
	}

	/// Creates a [`Kind::Danger`] notice with the given message.
	pub fn danger(message: impl Into<String>) -> Self {
		Self::of_kind(Kind::Danger, message)
	}

	/// Creates a [`Kind::Warning`] notice with the given message.
	pub fn warning(message: impl Into<String>) -> Self {
		Self::of_kind(Kind::Warning, message)
	}

	/// Creates a [`Kind::Info`] notice with the given message.
	pub fn info(message: impl Into<String>) -> Self {
		Self::of_kind(Kind::Info, message)
	}

	fn of_kind(kind: Kind, message: impl Into<String>) -> Self {
		Self {
			kind: Some(kind),
			message: Some(message.into()),
			..Self::default()
		}
	}

	/// Whether the digest pipeline has finalized this notice.
	pub fn is_digested(&self) -> bool {
		self.digested
	}

	pub(crate) fn mark_digested(&mut self) {
		self.digested = true;
	}
}

impl From<&str> for Notice {
	fn from(message: &str) -> Self {
		Self {
			message: Some(message.to_string()),
			..Self::default()
		}
	}
}

impl From<String> for Notice {
	fn from(message: String) -> Self {
		Self {
			message: Some(message),
			..Self::default()
		}
	}
}

/// Builder for [`Notice`].
#[derive(Debug, Default)]
pub struct NoticeBuilder {
	notice: Notice,
}

impl NoticeBuilder {
	/// Sets the category tag.
	pub fn kind(mut self, kind: Kind) -> Self {
		self.notice.kind = Some(kind);
		self
	}

	/// Sets the heading, formatted by the active title formatter at digest.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.notice.title = Some(title.into());
		self
	}

	/// Sets the body text.
	pub fn message(mut self, message: impl Into<String>) -> Self {
		self.notice.message = Some(message.into());
		self
	}

	/// Sets the dismissal policy directly.
	pub fn auto_dismiss(mut self, policy: AutoDismiss) -> Self {
		self.notice.auto_dismiss = Some(policy);
		self
	}

	/// Sets the dismissal window in milliseconds; `0` means never dismiss.
	pub fn timeout_ms(mut self, ms: u64) -> Self {
		self.notice.auto_dismiss = Some(AutoDismiss::from_millis(ms));
		self
	}

	/// Finishes the notice.
	pub fn build(self) -> Notice {
		self.notice
	}
}
