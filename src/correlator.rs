//! Request/response correlator (C5): maps an outgoing request's `id` to a
//! single-assignment completion slot, modeled on the
//! `Arc<RwLock<HashMap<_, _>>>` container pattern from `cache.rs`'s
//! `StreamCounts`/`EventBus`, but completing each entry exactly once via a
//! `oneshot` channel instead of broadcasting.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bridge_protocol::{EventType, Response};
use tokio::sync::oneshot;

use crate::error::Error;

struct Slot {
    sender: oneshot::Sender<Result<Response, Error>>,
    /// `None` means "accept any response type for this id" (used by
    /// fire-and-forget acks, which never actually go through the wire).
    expected_type: Option<EventType>,
}

/// An entry is inserted *before* the request is written to the socket, so a
/// reply racing the write back from the server can never be missed.
#[derive(Default, Clone)]
pub struct Correlator {
    inner: Arc<RwLock<HashMap<String, Slot>>>,
}

/// Result of offering a frame to the correlator (§4.6 step 3).
pub enum Offered {
    /// The frame matched a registered id and type; the waiter was woken.
    Delivered,
    /// The frame's `id` matched an entry, but the entry expects a different
    /// `type`. The entry is left in place and the frame falls through to
    /// the listener's other classification steps.
    TypeMismatch,
    /// No entry is registered for this `id` (unsolicited push, or already
    /// timed out and cancelled).
    NoMatch,
}

/// Handle returned by [`Correlator::register`]; awaiting it yields the
/// matching [`Response`] once the listener dispatches it.
pub struct Pending {
    id: String,
    receiver: oneshot::Receiver<Result<Response, Error>>,
}

impl Pending {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// # Errors
    /// Returns whatever error the listener attached when it dropped this
    /// entry without a normal fulfillment (e.g. an authentication failure),
    /// or [`Error::ConnectionClosed`] if the entry was dropped silently
    /// (`cancel`, or the connection closing with no more specific cause).
    pub async fn wait(self) -> Result<Response, Error> {
        match self.receiver.await {
            Ok(result) => result,
            Err(_) => Err(Error::connection_closed(
                "connection closed while awaiting response",
            )),
        }
    }
}

impl Correlator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot for `id`. Call this before the request is written so
    /// the listener can never observe a reply for an id with no waiter.
    /// `expected_type` restricts which response `type` is accepted as a
    /// match; `None` accepts whatever arrives first under this id.
    #[must_use]
    pub fn register(&self, id: impl Into<String>, expected_type: Option<EventType>) -> Pending {
        let id = id.into();
        let (tx, rx) = oneshot::channel();
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(
                id.clone(),
                Slot {
                    sender: tx,
                    expected_type,
                },
            );
        Pending { id, receiver: rx }
    }

    /// Offer `response` to the correlator. Writing a slot is idempotent:
    /// once a slot is removed (delivered or cancelled), a later frame with
    /// the same id is reported as [`Offered::NoMatch`], never as an error.
    pub fn offer(&self, response: Response) -> Offered {
        let Some(id) = response.id.clone() else {
            return Offered::NoMatch;
        };

        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let Some(slot) = guard.get(&id) else {
            return Offered::NoMatch;
        };

        if let Some(expected) = &slot.expected_type {
            if *expected != response.event_type {
                return Offered::TypeMismatch;
            }
        }

        let slot = guard.remove(&id).expect("checked present above");
        drop(guard);
        let _ = slot.sender.send(Ok(response));
        Offered::Delivered
    }

    /// Drop the slot for `id` without completing it, e.g. after the caller's
    /// own timeout elapses so a late reply does not leak the entry forever.
    pub fn cancel(&self, id: &str) {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(id);
    }

    /// Fail every currently pending entry with `error`, e.g. when the
    /// listener task detects `ERROR/BAD_TOKEN` and the connection is about
    /// to end: every in-flight request should see [`Error::Authentication`]
    /// rather than a generic disconnect (§8 scenario 5). Entries registered
    /// after this call are unaffected.
    pub fn fail_all(&self, error: &Error) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        for (_, slot) in guard.drain() {
            let _ = slot.sender.send(Err(error.clone()));
        }
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}
