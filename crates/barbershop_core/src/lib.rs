//! # Barbershop Core
//!
//! The sleeping-barber rendezvous, built from plain locks and condition
//! variables.
//!
//! ## Architecture
//!
//! ```text
//!   customer ──acquire_seat──> WaitingRoom <──await_occupant── barber
//!      │                                                         │
//!      │<──────────────── barber_ready ─────────────────────────│
//!      │──────────────── customer_ready ───────────────────────>│
//!      │<──────────────── haircut_done ─────────────────────────│
//! ```
//!
//! ## Rules
//!
//! 1. **No globals** - the room and the gates are owned objects behind `Arc`
//! 2. **One lock per concern** - four locks, never nested
//! 3. **Re-check on wake** - every wait loops on its predicate
//!
//! ## Example
//!
//! ```rust,ignore
//! use barbershop_core::{BarberProtocol, CustomerProtocol, ShopConfig, ShopFloor, ShopStats};
//!
//! let config = ShopConfig::default();
//! let floor = ShopFloor::new(config.capacity);
//! let stats = Arc::new(ShopStats::new());
//!
//! std::thread::spawn({
//!     let barber = BarberProtocol::new(floor.clone(), Absent, &config, Arc::clone(&stats));
//!     move || barber.run()
//! });
//!
//! let report = CustomerProtocol::new(1, floor, Absent, config.layout, stats).run();
//! ```

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod presence;
pub mod protocol;
pub mod stats;
pub mod sync;

pub use config::{Layout, ShopConfig, StageConfig};
pub use error::{ShopError, ShopResult};
pub use presence::{Absent, Activity, Position, Presence};
pub use protocol::{
    BarberProtocol, BarberState, CustomerOutcome, CustomerProtocol, CustomerReport, CustomerState,
};
pub use stats::{ShopStats, StatsSnapshot};
pub use sync::{Admission, Handshake, RendezvousGate, ShopFloor, WaitingRoom};
