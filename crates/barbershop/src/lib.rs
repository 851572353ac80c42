//! # Barbershop
//!
//! A running sleeping-barber shop on top of [`barbershop_core`].
//!
//! - [`stage`]: avatars that walk the floor plan and record their activity
//! - [`dispatcher`]: opens the shop, admits customers, collects departures
//! - [`arrivals`]: where customers come from
//!
//! ```rust,ignore
//! let shop = Shop::open(ShopConfig::default())?;
//! let (tx, rx) = crossbeam_channel::unbounded();
//! ArrivalSchedule { count: 10, interval, jitter, seed: 42 }.spawn(tx)?;
//! let summary = run_arrivals(&shop, &rx)?;
//! ```

#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arrivals;
pub mod dispatcher;
pub mod stage;

pub use arrivals::{spawn_line_arrivals, Arrival, ArrivalSchedule};
pub use dispatcher::{run_arrivals, RunSummary, Shop};
pub use stage::{Avatar, AvatarView, Role, Stage};
