//! "Just copied" feedback for the key table.
//!
//! A copy runs in two asynchronous steps, each on its own spawned task:
//! the clipboard write, then a revert timer once the write succeeded.
//! Neither task touches state directly. Both report back over a channel
//! with the ticket they were started for, and `CopyFeedback::apply` drops
//! any event whose ticket is no longer current. A superseded write or
//! revert timer is also cancelled through its `CancellationToken`, so an
//! older write never lands on the clipboard after a newer one and at most
//! one timer is ever live.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::clipboard::Clipboard;
use crate::error::ClipboardError;

pub const DEFAULT_COPY_FEEDBACK: Duration = Duration::from_millis(2_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyEvent {
    /// A clipboard write finished.
    Written {
        ticket: u64,
        id: String,
        result: Result<(), ClipboardError>,
    },
    /// A revert timer elapsed without being cancelled.
    Expired { ticket: u64 },
}

/// What applying a `CopyEvent` did to the feedback state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { id: String },
    Failed { id: String, error: ClipboardError },
    Reverted { id: String },
    /// The event belonged to a superseded copy and was ignored.
    Stale,
}

#[derive(Debug)]
struct Pending {
    ticket: u64,
    id: String,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct Copied {
    ticket: u64,
    id: String,
    timer: CancellationToken,
}

#[derive(Debug)]
pub struct CopyFeedback {
    delay: Duration,
    next_ticket: u64,
    pending: Option<Pending>,
    copied: Option<Copied>,
    tx: UnboundedSender<CopyEvent>,
    rx: UnboundedReceiver<CopyEvent>,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new(DEFAULT_COPY_FEEDBACK)
    }
}

impl CopyFeedback {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            delay,
            next_ticket: 0,
            pending: None,
            copied: None,
            tx,
            rx,
        }
    }

    /// Id currently flagged as copied.
    pub fn copied_id(&self) -> Option<&str> {
        self.copied.as_ref().map(|c| c.id.as_str())
    }

    /// Id whose clipboard write is still in flight.
    pub fn pending_id(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.id.as_str())
    }

    /// True while a write is in flight or a copied flag is waiting to revert.
    pub fn is_active(&self) -> bool {
        self.pending.is_some() || self.copied.is_some()
    }

    /// Spawn a clipboard write of `secret` for `id` and make it the pending
    /// copy. Any earlier pending write is cancelled and never reports back.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, id: &str, secret: String, clipboard: Arc<dyn Clipboard>) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let cancel = CancellationToken::new();
        if let Some(prev) = self.pending.replace(Pending {
            ticket,
            id: id.to_string(),
            cancel: cancel.clone(),
        }) {
            prev.cancel.cancel();
            debug!(ticket = prev.ticket, id = %prev.id, "cancelled superseded copy");
        }

        let tx = self.tx.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                result = clipboard.write(&secret) => {
                    // A closed channel means the dashboard is gone.
                    let _ = tx.send(CopyEvent::Written { ticket, id, result });
                }
            }
        });
        ticket
    }

    pub fn apply(&mut self, event: CopyEvent) -> CopyOutcome {
        match event {
            CopyEvent::Written { ticket, id, result } => {
                if self.pending.as_ref().map(|p| p.ticket) != Some(ticket) {
                    debug!(ticket, id = %id, "dropping stale clipboard result");
                    return CopyOutcome::Stale;
                }
                self.pending = None;
                match result {
                    Ok(()) => {
                        if let Some(prev) = self.copied.take() {
                            prev.timer.cancel();
                        }
                        let timer = CancellationToken::new();
                        spawn_revert(ticket, self.delay, timer.clone(), self.tx.clone());
                        self.copied = Some(Copied {
                            ticket,
                            id: id.clone(),
                            timer,
                        });
                        CopyOutcome::Copied { id }
                    }
                    Err(error) => {
                        warn!(id = %id, "clipboard write failed: {error}");
                        CopyOutcome::Failed { id, error }
                    }
                }
            }
            CopyEvent::Expired { ticket } => {
                if self.copied.as_ref().map(|c| c.ticket) != Some(ticket) {
                    debug!(ticket, "dropping stale revert");
                    return CopyOutcome::Stale;
                }
                match self.copied.take() {
                    Some(copied) => CopyOutcome::Reverted { id: copied.id },
                    None => CopyOutcome::Stale,
                }
            }
        }
    }

    /// Next event that is already waiting, without blocking.
    pub fn try_next(&mut self) -> Option<CopyEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event from a spawned write or timer.
    pub async fn next_event(&mut self) -> Option<CopyEvent> {
        self.rx.recv().await
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel.cancel();
        }
        if let Some(copied) = self.copied.take() {
            copied.timer.cancel();
        }
    }
}

fn spawn_revert(
    ticket: u64,
    delay: Duration,
    cancel: CancellationToken,
    tx: UnboundedSender<CopyEvent>,
) {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(delay) => {
                // A closed channel means the dashboard is gone.
                let _ = tx.send(CopyEvent::Expired { ticket });
            }
        }
    });
}
