//! Random ticket numbers drawn from the thread-local RNG.

use rand::Rng;

use crate::ports::{TicketNumberGenerator, TICKET_NUMBER_MAX, TICKET_NUMBER_MIN};

/// Draws ticket numbers uniformly from `10000..=99999`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTicketNumbers;

impl RandomTicketNumbers {
    pub fn new() -> Self {
        Self
    }
}

impl TicketNumberGenerator for RandomTicketNumbers {
    fn next_ticket_number(&self) -> String {
        let number = rand::thread_rng().gen_range(TICKET_NUMBER_MIN..=TICKET_NUMBER_MAX);
        number.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::is_ticket_number;

    #[test]
    fn numbers_are_always_five_digits() {
        let tickets = RandomTicketNumbers::new();
        for _ in 0..1_000 {
            let number = tickets.next_ticket_number();
            assert!(is_ticket_number(&number), "bad ticket number {number}");
        }
    }
}
