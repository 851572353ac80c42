//! # Shop Protocols
//!
//! Two state machines sharing one [`ShopFloor`](crate::sync::ShopFloor):
//! the barber, who loops forever, and the customers, one per arrival.
//! Each owns its own state; nothing here is shared except through the room
//! and the three handshake gates.

mod barber;
mod customer;

pub use barber::{BarberProtocol, BarberState};
pub use customer::{CustomerOutcome, CustomerProtocol, CustomerReport, CustomerState};
