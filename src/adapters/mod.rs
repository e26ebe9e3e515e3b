//! Adapters - Implementations of port interfaces.
//!
//! - `ticket_number` - ticket number generators (random, fixed)

pub mod ticket_number;

pub use ticket_number::{FixedTicketNumbers, RandomTicketNumbers};
