use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use herald_queue::Queue;

use crate::digest::DEFAULT_MESSAGE;
use crate::notice::{AutoDismiss, Kind, Notice};

/// Idempotent dismissal trigger for one displayed notice.
///
/// Cloned freely into display layers. The first `close` dismisses the
/// notice it was issued for; later calls and handles outliving that notice
/// are no-ops.
#[derive(Debug, Clone)]
pub struct CloseHandle {
	token: CancellationToken,
}

impl CloseHandle {
	pub(crate) fn new(token: CancellationToken) -> Self {
		Self { token }
	}

	/// Handle wired to no display slot; closing does nothing.
	pub(crate) fn inert() -> Self {
		Self {
			token: CancellationToken::new(),
		}
	}

	/// Dismisses the notice this handle was issued for.
	pub fn close(&self) {
		self.token.cancel();
	}
}

/// Display-ready notice handed to an [`AlertRenderer`].
///
/// Carries the digested notice's resolved fields plus the two hooks a
/// display layer needs: dismissal and the count of notices waiting behind
/// this one.
#[derive(Clone)]
pub struct Alert {
	kind: Kind,
	title: Option<String>,
	message: String,
	auto_dismiss: AutoDismiss,
	close: CloseHandle,
	backlog: Option<Queue<Notice>>,
}

impl Alert {
	pub(crate) fn new(notice: &Notice, close: CloseHandle, backlog: Option<Queue<Notice>>) -> Self {
		Self {
			kind: notice.kind.unwrap_or_default(),
			title: notice.title.clone(),
			message: notice.message.clone().unwrap_or_else(|| DEFAULT_MESSAGE.to_string()),
			auto_dismiss: notice.auto_dismiss.unwrap_or_default(),
			close,
			backlog,
		}
	}

	/// Category tag for styling.
	pub fn kind(&self) -> Kind {
		self.kind
	}

	/// Formatted heading, when the notice carried one.
	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// Body text.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Resolved dismissal policy, for countdown displays.
	pub fn auto_dismiss(&self) -> AutoDismiss {
		self.auto_dismiss
	}

	/// Dismisses this notice. Idempotent.
	pub fn close(&self) {
		self.close.close();
	}

	/// Dismissal handle for wiring into other components.
	pub fn close_handle(&self) -> CloseHandle {
		self.close.clone()
	}

	/// Notices queued behind this one, for a badge or countdown display.
	pub fn queued_count(&self) -> usize {
		self.backlog.as_ref().map_or(0, Queue::len)
	}
}

impl fmt::Debug for Alert {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Alert")
			.field("kind", &self.kind)
			.field("title", &self.title)
			.field("message", &self.message)
			.field("auto_dismiss", &self.auto_dismiss)
			.finish_non_exhaustive()
	}
}

/// Pluggable presentation strategy for one display slot.
pub trait AlertRenderer: Send + Sync {
	/// Called when a digested notice enters the display slot.
	fn show(&self, alert: Alert);

	/// Called when the display slot empties.
	fn clear(&self) {}
}

impl<R: AlertRenderer + ?Sized> AlertRenderer for Arc<R> {
	fn show(&self, alert: Alert) {
		(**self).show(alert);
	}

	fn clear(&self) {
		(**self).clear();
	}
}

/// Placeholder renderer that displays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl AlertRenderer for NullRenderer {
	fn show(&self, _alert: Alert) {}
}

/// Renderer that presents alerts as structured log events, for headless
/// hosts and embedders without a display surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceRenderer;

impl AlertRenderer for TraceRenderer {
	fn show(&self, alert: Alert) {
		tracing::info!(
			kind = alert.kind().as_str(),
			title = alert.title().unwrap_or_default(),
			message = alert.message(),
			queued = alert.queued_count(),
			"notice.show"
		);
	}

	fn clear(&self) {
		tracing::info!("notice.clear");
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn alert_projects_resolved_fields() {
		let mut notice = Notice::builder()
			.kind(Kind::Success)
			.title("Saved")
			.message("all changes written")
			.timeout_ms(0)
			.build();
		notice.mark_digested();

		let backlog = Queue::with_items([Notice::from("next"), Notice::from("later")]);
		let alert = Alert::new(&notice, CloseHandle::inert(), Some(backlog));
		assert_eq!(alert.kind(), Kind::Success);
		assert_eq!(alert.title(), Some("Saved"));
		assert_eq!(alert.message(), "all changes written");
		assert_eq!(alert.auto_dismiss(), AutoDismiss::Never);
		assert_eq!(alert.queued_count(), 2);
	}

	#[test]
	fn detached_alert_reports_an_empty_backlog() {
		let alert = Alert::new(&Notice::from("solo"), CloseHandle::inert(), None);
		assert_eq!(alert.queued_count(), 0);
		// Closing an inert handle is harmless.
		alert.close();
		alert.close();
	}
}
