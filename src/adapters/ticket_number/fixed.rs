//! Deterministic ticket numbers for tests.
//!
//! Cycles through a fixed list. Unlike the random adapter this one
//! does not validate its input, so tests can exercise odd values.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ports::TicketNumberGenerator;

/// Hands out the configured numbers in order, wrapping around at the end.
#[derive(Debug)]
pub struct FixedTicketNumbers {
    numbers: Vec<String>,
    cursor: AtomicUsize,
}

impl FixedTicketNumbers {
    /// Always returns `number`.
    pub fn always(number: impl Into<String>) -> Self {
        Self::sequence(vec![number.into()])
    }

    /// Returns `numbers` in order, then starts over.
    ///
    /// An empty list falls back to `"10000"`.
    pub fn sequence(numbers: Vec<String>) -> Self {
        let numbers = if numbers.is_empty() {
            vec!["10000".to_string()]
        } else {
            numbers
        };
        Self {
            numbers,
            cursor: AtomicUsize::new(0),
        }
    }

    /// How many numbers were handed out so far.
    pub fn issued(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl TicketNumberGenerator for FixedTicketNumbers {
    fn next_ticket_number(&self) -> String {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.numbers[index % self.numbers.len()].clone()
    }
}
