//! Ticket number generators.
//!
//! - `RandomTicketNumbers` - uniform five-digit numbers for real sessions
//! - `FixedTicketNumbers` - a fixed sequence for deterministic tests and demos

mod fixed;
mod random;

pub use fixed::FixedTicketNumbers;
pub use random::RandomTicketNumbers;
