//! Display slot with last-writer-wins publishing
//!
//! Every upload takes a ticket from [`DisplaySlot::begin`]. Starting a new
//! upload cancels the previous ticket, and [`DisplaySlot::publish`] accepts a
//! result only from the most recent ticket. A slow upload that finishes after
//! a newer one started never replaces what is on screen.
//!
//! Published states are broadcast on a `tokio::sync::watch` channel so the
//! renderer always sees the latest one.

use runboard_common::{Dashboard, Result};
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// What the presentation layer shows for one upload
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// Upload accepted; statistics ready
    Ready(Dashboard),
    /// Upload rejected; every message to show at once
    Rejected(Vec<String>),
}

impl DisplayState {
    pub fn from_result(result: Result<Dashboard>) -> Self {
        match result {
            Ok(dashboard) => DisplayState::Ready(dashboard),
            Err(err) => DisplayState::Rejected(err.user_messages()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DisplayState::Ready(_))
    }
}

/// A display state tagged with the upload generation that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub generation: u64,
    pub state: DisplayState,
}

/// Permission for one upload to publish its result
#[derive(Debug, Clone)]
pub struct UploadTicket {
    generation: u64,
    token: CancellationToken,
}

impl UploadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Cancelled once a newer upload begins
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

#[derive(Debug, Default)]
struct SlotState {
    latest: u64,
    active: Option<CancellationToken>,
}

/// Holder of the latest published upload result
#[derive(Debug)]
pub struct DisplaySlot {
    state: Mutex<SlotState>,
    tx: watch::Sender<Option<Published>>,
}

impl DisplaySlot {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            state: Mutex::new(SlotState::default()),
            tx,
        }
    }

    /// Start a new upload, superseding any in flight
    pub async fn begin(&self) -> UploadTicket {
        let mut slot = self.state.lock().await;
        slot.latest += 1;

        let token = CancellationToken::new();
        if let Some(previous) = slot.active.replace(token.clone()) {
            previous.cancel();
        }

        debug!(generation = slot.latest, "Upload started");
        UploadTicket {
            generation: slot.latest,
            token,
        }
    }

    /// Publish a result if `ticket` is still the latest upload
    ///
    /// Returns false when the result was discarded.
    pub async fn publish(&self, ticket: &UploadTicket, state: DisplayState) -> bool {
        let slot = self.state.lock().await;
        if ticket.generation != slot.latest || ticket.token.is_cancelled() {
            debug!(
                generation = ticket.generation,
                latest = slot.latest,
                "Discarding superseded upload result"
            );
            return false;
        }

        self.tx.send_replace(Some(Published {
            generation: ticket.generation,
            state,
        }));
        true
    }

    /// The most recently published state, if any
    pub fn current(&self) -> Option<Published> {
        self.tx.borrow().clone()
    }

    /// Receive every newly published state
    pub fn subscribe(&self) -> watch::Receiver<Option<Published>> {
        self.tx.subscribe()
    }
}

impl Default for DisplaySlot {
    fn default() -> Self {
        Self::new()
    }
}
