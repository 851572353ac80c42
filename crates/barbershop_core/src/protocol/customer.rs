//! # Customer Protocol
//!
//! One short-lived thread per arrival.
//!
//! ```text
//!   Arriving ── no chair ──> Rejected                      (leave)
//!      │
//!   Seated(i) ── barber_ready.await_and_consume()
//!      │         release_seat(i)
//!   MovingToChair ── customer_ready.signal()
//!      │
//!   Receiving ── haircut_done.await_and_consume()
//!      │
//!   Departed                                               (leave)
//! ```
//!
//! The seat is released the moment the barber calls, before the walk to the
//! service chair, so a new arrival can take it straight away.
//!
//! `haircut_done` is a single flag: a customer who reaches `Receiving` early
//! can consume the signal meant for the one still in the chair. Each signal is
//! still consumed exactly once, so both finish, just not in chair order.

use std::sync::Arc;

use crate::config::Layout;
use crate::presence::{blocked, Presence};
use crate::stats::ShopStats;
use crate::sync::{Admission, ShopFloor};

/// Where a customer is in its visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomerState {
    /// Just walked in.
    Arriving,
    /// Turned away, all chairs taken. Terminal.
    Rejected,
    /// Holding a waiting chair.
    Seated,
    /// Called by the barber, walking to the service chair.
    MovingToChair,
    /// In the service chair.
    Receiving,
    /// Haircut done, gone. Terminal.
    Departed,
}

impl CustomerState {
    /// Whether the visit is over.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Departed)
    }
}

/// How a visit ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomerOutcome {
    /// Got a haircut after waiting in `seat`.
    Served {
        /// The waiting chair that was used.
        seat: usize,
    },
    /// No free chair on arrival.
    Rejected,
}

/// Record of one finished visit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerReport {
    /// Customer number assigned by whoever spawned it.
    pub id: u64,
    /// How the visit ended.
    pub outcome: CustomerOutcome,
    /// Every state the customer passed through, in order.
    pub trail: Vec<CustomerState>,
}

/// Customer state machine.
pub struct CustomerProtocol<P> {
    id: u64,
    floor: ShopFloor,
    presence: P,
    layout: Layout,
    stats: Arc<ShopStats>,
    trail: Vec<CustomerState>,
}

impl<P: Presence> CustomerProtocol<P> {
    /// Creates a customer in the `Arriving` state.
    pub fn new(id: u64, floor: ShopFloor, presence: P, layout: Layout, stats: Arc<ShopStats>) -> Self {
        Self {
            id,
            floor,
            presence,
            layout,
            stats,
            trail: vec![CustomerState::Arriving],
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> CustomerState {
        self.trail.last().copied().unwrap_or(CustomerState::Arriving)
    }

    /// Runs the visit to completion.
    pub fn run(mut self) -> CustomerReport {
        let room = Arc::clone(&self.floor.room);
        let handshake = Arc::clone(&self.floor.handshake);

        self.presence.enter();
        self.stats.record_arrival();

        let seat = match room.acquire_seat() {
            Admission::Seated(seat) => seat,
            Admission::Rejected => {
                tracing::info!(customer = self.id, "waiting room full, turned away");
                self.stats.record_rejected();
                self.presence.leave();
                self.transition(CustomerState::Rejected);
                return self.finish(CustomerOutcome::Rejected);
            }
        };

        self.stats.record_seated(room.peak_occupancy());
        tracing::info!(customer = self.id, seat, "seated");
        self.transition(CustomerState::Seated);
        self.presence.move_to(self.layout.waiting_chair(seat));

        blocked(&mut self.presence, || handshake.barber_ready.await_and_consume());
        room.release_seat(seat);

        self.transition(CustomerState::MovingToChair);
        self.presence.move_to(self.layout.barber_chair);
        handshake.customer_ready.signal();

        self.transition(CustomerState::Receiving);
        blocked(&mut self.presence, || handshake.haircut_done.await_and_consume());

        self.transition(CustomerState::Departed);
        self.stats.record_served();
        self.presence.leave();
        tracing::info!(customer = self.id, "served, leaving");

        self.finish(CustomerOutcome::Served { seat })
    }

    fn transition(&mut self, next: CustomerState) {
        let from = self.state();
        debug_assert!(!from.is_terminal(), "customer {} moved after {from:?}", self.id);
        tracing::debug!(customer = self.id, ?from, to = ?next, "customer transition");
        self.trail.push(next);
    }

    fn finish(self, outcome: CustomerOutcome) -> CustomerReport {
        CustomerReport {
            id: self.id,
            outcome,
            trail: self.trail,
        }
    }
}
