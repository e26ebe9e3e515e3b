//! TicketNumberGenerator port - Source of simulated support ticket numbers.
//!
//! Scripted replies may contain the `{ticket_id}` placeholder. Each session
//! draws one number from this port when it starts and substitutes it into
//! every reply it delivers, so a conversation refers to a single ticket.

/// Smallest ticket number handed out.
pub const TICKET_NUMBER_MIN: u32 = 10_000;

/// Largest ticket number handed out.
pub const TICKET_NUMBER_MAX: u32 = 99_999;

/// Port for producing five-digit ticket numbers.
///
/// # Example
///
/// ```ignore
/// let ticket_id = tickets.next_ticket_number();
/// assert_eq!(ticket_id.len(), 5);
/// ```
pub trait TicketNumberGenerator: Send + Sync {
    /// Returns the next ticket number, formatted for display.
    fn next_ticket_number(&self) -> String;
}

/// Returns true if `value` is a well-formed ticket number.
pub fn is_ticket_number(value: &str) -> bool {
    value
        .parse::<u32>()
        .map(|n| (TICKET_NUMBER_MIN..=TICKET_NUMBER_MAX).contains(&n))
        .unwrap_or(false)
        && value.len() == 5
}
