//! Ports - Interfaces the application layer depends on.
//!
//! Adapters under `crate::adapters` provide the implementations.

mod ticket_number;

pub use ticket_number::{
    is_ticket_number, TicketNumberGenerator, TICKET_NUMBER_MAX, TICKET_NUMBER_MIN,
};
