//! # Synchronization Primitives for the Shop
//!
//! Four independent locks, never nested:
//!
//! ```text
//!   WaitingRoom      seats + occupancy           (1 lock, 1 condvar)
//!   barber_ready     "next customer, please"     (1 lock, 1 condvar)
//!   customer_ready   "I'm in the chair"          (1 lock, 1 condvar)
//!   haircut_done     "you're done"               (1 lock, 1 condvar)
//! ```
//!
//! Seat bookkeeping never waits on handshake progress, and a slow handshake
//! never holds up arrivals.

mod gate;
mod waiting_room;

pub use gate::RendezvousGate;
pub use waiting_room::{Admission, WaitingRoom};

use std::sync::Arc;

/// The three gates of one service cycle, shared by the barber and every
/// customer.
#[derive(Debug, Default)]
pub struct Handshake {
    /// Barber announces availability; consumed by exactly one seated customer.
    pub barber_ready: RendezvousGate,
    /// Customer reports being in the service chair.
    pub customer_ready: RendezvousGate,
    /// Barber releases the customer.
    pub haircut_done: RendezvousGate,
}

impl Handshake {
    /// Creates three lowered gates.
    ///
    /// The barber's first pass through its loop raises `barber_ready`, so the
    /// first customer is called as soon as one is seated.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Everything the protocols share: the room and the handshake.
#[derive(Debug, Clone)]
pub struct ShopFloor {
    /// Waiting chairs.
    pub room: Arc<WaitingRoom>,
    /// Handshake gates.
    pub handshake: Arc<Handshake>,
}

impl ShopFloor {
    /// Creates a floor with `capacity` waiting chairs.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            room: Arc::new(WaitingRoom::new(capacity)),
            handshake: Arc::new(Handshake::new()),
        }
    }
}
