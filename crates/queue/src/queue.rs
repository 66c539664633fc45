use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

struct QueueState<T> {
	buffer: VecDeque<T>,
	waiter: Option<oneshot::Sender<T>>,
}

struct QueueInner<T> {
	state: Mutex<QueueState<T>>,
}

/// Unbounded FIFO mailbox with at most one parked consumer wait.
///
/// Producers deliver with the synchronous [`Queue::accept`]; the single
/// consumer pulls with the asynchronous [`Queue::next`]. When a consumer is
/// parked, `accept` hands the item to it directly instead of buffering, so
/// delivery order is exactly accept order. Handles are cheap clones of one
/// shared queue.
pub struct Queue<T> {
	inner: Arc<QueueInner<T>>,
}

impl<T> Clone for Queue<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> Default for Queue<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Queue<T> {
	/// Creates an empty queue.
	pub fn new() -> Self {
		Self {
			inner: Arc::new(QueueInner {
				state: Mutex::new(QueueState {
					buffer: VecDeque::new(),
					waiter: None,
				}),
			}),
		}
	}

	/// Creates a queue pre-seeded with `items` in iteration order.
	pub fn with_items(items: impl IntoIterator<Item = T>) -> Self {
		Self {
			inner: Arc::new(QueueInner {
				state: Mutex::new(QueueState {
					buffer: items.into_iter().collect(),
					waiter: None,
				}),
			}),
		}
	}

	/// Delivers one item. Never fails and never blocks.
	///
	/// If a consumer is parked in [`Queue::next`], the item is handed to it
	/// directly and is not buffered; the wait resolves exactly once.
	/// Otherwise the item is appended to the buffer tail.
	pub fn accept(&self, item: T) {
		let mut state = self.inner.state.lock();
		let item = match state.waiter.take() {
			Some(waiter) => match waiter.send(item) {
				Ok(()) => return,
				// Wait abandoned without cancelling; keep the item.
				Err(item) => item,
			},
			None => item,
		};
		state.buffer.push_back(item);
	}

	/// Resolves to the next item in FIFO order.
	///
	/// A non-empty buffer resolves immediately with the head item. An empty
	/// buffer installs the queue's single wait slot and suspends until
	/// [`Queue::accept`] fulfils it. A later `next` call replaces the slot;
	/// the superseded future resolves `None`, as does a wait cancelled via
	/// [`Queue::cancel_wait`]. `None` never means "queue empty".
	pub async fn next(&self) -> Option<T> {
		let rx = {
			let mut state = self.inner.state.lock();
			if let Some(item) = state.buffer.pop_front() {
				return Some(item);
			}
			let (tx, rx) = oneshot::channel();
			// Single slot: installing drops any superseded waiter.
			state.waiter = Some(tx);
			rx
		};
		rx.await.ok()
	}

	/// Non-blocking removal of the head item, bypassing the wait slot.
	pub fn try_next(&self) -> Option<T> {
		self.inner.state.lock().buffer.pop_front()
	}

	/// Empties the buffer and returns its contents in FIFO order.
	pub fn drain(&self) -> Vec<T> {
		let mut state = self.inner.state.lock();
		state.buffer.drain(..).collect()
	}

	/// Cancels an outstanding wait without resolving it; the parked future
	/// yields `None`. No-op when nothing is waiting.
	pub fn cancel_wait(&self) {
		self.inner.state.lock().waiter = None;
	}

	/// Count of buffered, not-yet-delivered items. An item already handed
	/// to a consumer is not counted.
	pub fn len(&self) -> usize {
		self.inner.state.lock().buffer.len()
	}

	/// Whether no items are buffered.
	pub fn is_empty(&self) -> bool {
		self.inner.state.lock().buffer.is_empty()
	}
}

impl<T> FromIterator<T> for Queue<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self::with_items(iter)
	}
}
