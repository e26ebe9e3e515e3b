//! Timed delivery queue for scripted messages.
//!
//! Entries are released strictly in the order they were scheduled: an entry
//! is handed out only once it, and every entry scheduled before it, is due or
//! cancelled. A long delay followed by a short one therefore delivers both
//! when the long one expires, in their original order.
//!
//! Every entry carries a child of the queue's root `CancellationToken`.
//! Cancelling one token skips that entry; cancelling the root drops them all
//! and makes the queue refuse further work.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::message::Message;

#[derive(Debug)]
struct PendingDelivery {
    seq: u64,
    due: Instant,
    message: Message,
    token: CancellationToken,
}

impl PendingDelivery {
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Ordered queue of `(due, message)` pairs.
#[derive(Debug)]
pub struct TimedMessageQueue {
    pending: VecDeque<PendingDelivery>,
    root: CancellationToken,
    next_seq: u64,
}

impl Default for TimedMessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TimedMessageQueue {
    /// Creates an empty queue with a fresh root token.
    pub fn new() -> Self {
        Self::with_root(CancellationToken::new())
    }

    /// Creates an empty queue whose deliveries hang off `root`.
    pub fn with_root(root: CancellationToken) -> Self {
        Self {
            pending: VecDeque::new(),
            root,
            next_seq: 0,
        }
    }

    /// Schedules `message` for delivery `after` from now.
    pub fn schedule(&mut self, message: Message, after: Duration) -> CancellationToken {
        self.schedule_at(message, Instant::now() + after)
    }

    /// Schedules `message` for delivery at `due`.
    ///
    /// Once the queue is closed the message is dropped and the returned token
    /// is already cancelled.
    pub fn schedule_at(&mut self, message: Message, due: Instant) -> CancellationToken {
        let token = self.root.child_token();
        if self.is_closed() {
            tracing::debug!(message_id = %message.id(), "dropping delivery scheduled on closed queue");
            return token;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push_back(PendingDelivery {
            seq,
            due,
            message,
            token: token.clone(),
        });
        token
    }

    /// When the front live entry becomes due, if anything is pending.
    pub fn next_due(&self) -> Option<Instant> {
        self.pending
            .iter()
            .find(|entry| !entry.is_cancelled())
            .map(|entry| entry.due)
    }

    /// Removes and returns every message deliverable at `now`, in schedule order.
    ///
    /// Cancelled entries at the front are discarded; draining stops at the
    /// first live entry that is not yet due.
    pub fn drain_due(&mut self, now: Instant) -> Vec<Message> {
        let mut ready = Vec::new();
        while let Some(front) = self.pending.front() {
            if front.is_cancelled() {
                if let Some(skipped) = self.pending.pop_front() {
                    tracing::trace!(seq = skipped.seq, "skipping cancelled delivery");
                }
                continue;
            }
            if front.due > now {
                break;
            }
            if let Some(entry) = self.pending.pop_front() {
                ready.push(entry.message);
            }
        }
        ready
    }

    /// Cancels every pending delivery and closes the queue.
    pub fn cancel_all(&mut self) {
        self.root.cancel();
        let dropped = self.pending.len();
        self.pending.clear();
        if dropped > 0 {
            tracing::debug!(dropped, "cancelled pending deliveries");
        }
    }

    /// Number of live (not cancelled) pending deliveries.
    pub fn len(&self) -> usize {
        self.pending.iter().filter(|e| !e.is_cancelled()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once `cancel_all` ran or the root token was cancelled.
    pub fn is_closed(&self) -> bool {
        self.root.is_cancelled()
    }

    /// The root token every delivery token descends from.
    pub fn root(&self) -> &CancellationToken {
        &self.root
    }
}
