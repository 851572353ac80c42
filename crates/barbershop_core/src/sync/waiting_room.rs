//! # Waiting Room
//!
//! Fixed number of chairs, one lock, one condition variable.
//!
//! Customers never wait for a chair: a full room turns them away on the
//! spot. The only thing anyone waits for here is "somebody is sitting",
//! which is how the barber naps between customers.
//!
//! Seats are handed out lowest free index first. Two customers racing for the
//! last chair are ordered by who takes the lock first, not by who walked in
//! first. That is accepted behavior, not a queue.

use parking_lot::{Condvar, Mutex};

/// Outcome of asking for a waiting chair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The customer holds this seat index until released.
    Seated(usize),
    /// Every chair was taken.
    Rejected,
}

impl Admission {
    /// The seat index, if seated.
    #[must_use]
    pub fn seat(self) -> Option<usize> {
        match self {
            Self::Seated(seat) => Some(seat),
            Self::Rejected => None,
        }
    }
}

/// Seat bookkeeping, only touched under the room lock.
#[derive(Debug)]
struct Seats {
    /// `true` = free.
    open: Vec<bool>,
    /// Seated but not yet called customers.
    occupancy: usize,
    /// Highest occupancy ever reached.
    peak: usize,
}

impl Seats {
    fn check_invariants(&self) {
        debug_assert!(
            self.occupancy <= self.open.len(),
            "occupancy {} exceeds capacity {}",
            self.occupancy,
            self.open.len()
        );
        debug_assert!(self.peak >= self.occupancy, "peak below occupancy");
        debug_assert_eq!(
            self.open.iter().filter(|free| !**free).count(),
            self.occupancy,
            "occupied seats disagree with occupancy"
        );
    }
}

/// Fixed-capacity seat allocator with a blocking occupancy query.
#[derive(Debug)]
pub struct WaitingRoom {
    /// Seat state.
    seats: Mutex<Seats>,
    /// Wakes the barber when someone sits down.
    occupied: Condvar,
    /// Number of chairs.
    capacity: usize,
}

impl WaitingRoom {
    /// Creates a room with `capacity` free chairs.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "a waiting room needs at least one chair");

        Self {
            seats: Mutex::new(Seats {
                open: vec![true; capacity],
                occupancy: 0,
                peak: 0,
            }),
            occupied: Condvar::new(),
            capacity,
        }
    }

    /// Number of chairs.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Takes the lowest free chair, or turns the customer away.
    ///
    /// Never blocks beyond the lock itself.
    pub fn acquire_seat(&self) -> Admission {
        let mut seats = self.seats.lock();
        if seats.occupancy == self.capacity {
            return Admission::Rejected;
        }

        let Some(seat) = seats.open.iter().position(|free| *free) else {
            debug_assert!(false, "occupancy below capacity but no free seat");
            return Admission::Rejected;
        };

        seats.open[seat] = false;
        seats.occupancy += 1;
        seats.peak = seats.peak.max(seats.occupancy);
        seats.check_invariants();

        self.occupied.notify_one();
        Admission::Seated(seat)
    }

    /// Gives a chair back.
    ///
    /// Nobody waits for a free chair, so nobody is notified.
    pub fn release_seat(&self, seat: usize) {
        let mut seats = self.seats.lock();
        debug_assert!(seat < self.capacity, "seat {seat} out of range");
        debug_assert!(!seats.open[seat], "seat {seat} released twice");

        seats.open[seat] = true;
        seats.occupancy -= 1;
        seats.check_invariants();
    }

    /// Blocks until at least one chair is occupied.
    pub fn await_occupant(&self) {
        let mut seats = self.seats.lock();
        while seats.occupancy == 0 {
            self.occupied.wait(&mut seats);
        }
    }

    /// Snapshot of how many customers are seated.
    #[must_use]
    pub fn current_occupancy(&self) -> usize {
        self.seats.lock().occupancy
    }

    /// Most chairs ever occupied at once, as seen under the lock.
    #[must_use]
    pub fn peak_occupancy(&self) -> usize {
        self.seats.lock().peak
    }

    /// Snapshot of which chairs are free.
    #[must_use]
    pub fn open_seats(&self) -> Vec<bool> {
        self.seats.lock().open.clone()
    }
}
