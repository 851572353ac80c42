//! # Shop Statistics
//!
//! Lock-free counters written by the protocol threads and read by whoever
//! reports on the shop. None of these take part in synchronization.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Live counters.
#[derive(Debug, Default)]
pub struct ShopStats {
    arrivals: AtomicU64,
    seated: AtomicU64,
    rejected: AtomicU64,
    served: AtomicU64,
    haircuts: AtomicU64,
    peak_occupancy: AtomicUsize,
}

/// Point-in-time copy of [`ShopStats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Customers who walked in.
    pub arrivals: u64,
    /// Customers who got a waiting chair.
    pub seated: u64,
    /// Customers turned away at the door.
    pub rejected: u64,
    /// Customers who left with a haircut.
    pub served: u64,
    /// Haircuts the barber finished.
    pub haircuts: u64,
    /// Most chairs ever occupied at once.
    pub peak_occupancy: usize,
}

impl ShopStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_arrival(&self) {
        self.arrivals.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_seated(&self, occupancy: usize) {
        self.seated.fetch_add(1, Ordering::Relaxed);
        self.peak_occupancy.fetch_max(occupancy, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_served(&self) {
        self.served.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_haircut(&self) {
        self.haircuts.fetch_add(1, Ordering::Relaxed);
    }

    /// Copies the counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            arrivals: self.arrivals.load(Ordering::Relaxed),
            seated: self.seated.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            served: self.served.load(Ordering::Relaxed),
            haircuts: self.haircuts.load(Ordering::Relaxed),
            peak_occupancy: self.peak_occupancy.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    /// Customers still somewhere between the door and the exit.
    #[must_use]
    pub fn in_shop(&self) -> u64 {
        self.arrivals.saturating_sub(self.rejected + self.served)
    }
}
