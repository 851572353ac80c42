//! # Barber Protocol
//!
//! The one long-lived thread of the shop.
//!
//! ## Cycle
//!
//! ```text
//!   AtStand ── room empty? ──yes──> nap in the chair until someone sits
//!      │                                         │
//!      │<────────────────────────────────────────┘
//!      ├── barber_ready.signal()
//!      ├── customer_ready.await_and_consume()
//!   Serving ── cut for service_duration
//!      ├── haircut_done.signal()
//!      └── back to AtStand
//! ```
//!
//! The barber never terminates. There is no cancellation and no restart: a
//! fault in here takes the process down.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{Layout, ShopConfig};
use crate::presence::{blocked, Activity, Presence};
use crate::stats::ShopStats;
use crate::sync::ShopFloor;

/// Where the barber is in the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BarberState {
    /// Between customers, possibly napping.
    AtStand,
    /// Cutting hair.
    Serving,
}

/// Barber state machine.
pub struct BarberProtocol<P> {
    floor: ShopFloor,
    presence: P,
    layout: Layout,
    service_duration: Duration,
    stats: Arc<ShopStats>,
    state: BarberState,
    cycles: u64,
}

impl<P: Presence> BarberProtocol<P> {
    /// Creates the barber. Nothing happens until [`run`](Self::run) or
    /// [`serve_one`](Self::serve_one).
    pub fn new(floor: ShopFloor, presence: P, config: &ShopConfig, stats: Arc<ShopStats>) -> Self {
        Self {
            floor,
            presence,
            layout: config.layout.clone(),
            service_duration: config.service_duration(),
            stats,
            state: BarberState::AtStand,
            cycles: 0,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> BarberState {
        self.state
    }

    /// Completed service cycles.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Walks in and takes position at the stand.
    pub fn enter(&mut self) {
        self.presence.enter();
        self.presence.move_to(self.layout.barber_stand);
    }

    /// Enters the shop and serves customers forever.
    pub fn run(mut self) -> ! {
        self.enter();
        tracing::info!("barber on duty");
        loop {
            self.serve_one();
        }
    }

    /// Runs one full service cycle, napping first if nobody is waiting.
    ///
    /// Returns after `haircut_done` has been signaled.
    pub fn serve_one(&mut self) {
        let room = Arc::clone(&self.floor.room);
        let handshake = Arc::clone(&self.floor.handshake);

        self.transition(BarberState::AtStand);
        self.presence.move_to(self.layout.barber_stand);

        if room.current_occupancy() == 0 {
            tracing::debug!("no customers, barber naps");
            self.presence.move_to(self.layout.barber_chair);
            blocked(&mut self.presence, || room.await_occupant());
            self.presence.move_to(self.layout.barber_stand);
        }

        // Occupancy cannot drop between the check and this signal: a seated
        // customer only leaves its chair after consuming it.
        handshake.barber_ready.signal();
        blocked(&mut self.presence, || handshake.customer_ready.await_and_consume());

        self.transition(BarberState::Serving);
        self.cut_hair();
        handshake.haircut_done.signal();

        self.cycles += 1;
        self.stats.record_haircut();
        tracing::info!(cycle = self.cycles, "haircut done");

        self.transition(BarberState::AtStand);
    }

    fn cut_hair(&mut self) {
        self.presence.set_state(Activity::Working);
        thread::sleep(self.service_duration);
        self.presence.set_state(Activity::Idle);
    }

    fn transition(&mut self, next: BarberState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "barber transition");
            self.state = next;
        }
    }
}
