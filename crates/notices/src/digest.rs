use std::sync::Arc;

use heck::ToTitleCase;

use crate::notice::{AutoDismiss, Kind, Notice};

/// Shared title formatter applied to a notice's heading during digest.
pub type TitleFormat = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Shared digest function: raw notice, title formatter, and fallback
/// message in; display-ready notice out.
pub type DigestFn = Arc<dyn Fn(Notice, &TitleFormat, &str) -> Notice + Send + Sync>;

/// Builtin fallback substituted for an absent message body.
pub const DEFAULT_MESSAGE: &str = "No message!";

/// Builtin title formatter.
pub fn title_case(input: &str) -> String {
	input.to_title_case()
}

/// Builtin digest: fills the category tag, formats the heading, and
/// substitutes the fallback message. Already-digested notices pass through
/// unchanged.
pub fn digest(mut notice: Notice, title_format: &TitleFormat, fallback_message: &str) -> Notice {
	if notice.is_digested() {
		return notice;
	}
	if notice.kind.is_none() {
		notice.kind = Some(Kind::default());
	}
	if let Some(title) = notice.title.take() {
		notice.title = Some(title_format(&title));
	}
	if notice.message.is_none() {
		notice.message = Some(fallback_message.to_string());
	}
	notice.mark_digested();
	notice
}

/// Runs the whole pipeline: the active digest function plus dismissal
/// resolution, marking the result digested.
///
/// Idempotence is enforced here rather than inside the digest function, so
/// it holds even when a scope or registry supplies a digest of its own.
/// The dismissal window always resolves through [`resolve_auto_dismiss`],
/// whichever digest function is active.
pub fn finalize(
	notice: Notice,
	digest_fn: &DigestFn,
	title_format: &TitleFormat,
	fallback_message: &str,
	scope_dismiss: Option<AutoDismiss>,
) -> Notice {
	let mut notice = if notice.is_digested() {
		notice
	} else {
		digest_fn(notice, title_format, fallback_message)
	};
	if notice.auto_dismiss.is_none() {
		notice.auto_dismiss = Some(resolve_auto_dismiss(None, scope_dismiss));
	}
	notice.mark_digested();
	notice
}

/// First-present resolution for the dismissal window: the notice's own
/// value, else the scope's configured default, else
/// [`AutoDismiss::DEFAULT`]. [`AutoDismiss::Never`] is a present value and
/// is never replaced by a fallback.
pub fn resolve_auto_dismiss(notice: Option<AutoDismiss>, scope: Option<AutoDismiss>) -> AutoDismiss {
	notice.or(scope).unwrap_or(AutoDismiss::DEFAULT)
}
