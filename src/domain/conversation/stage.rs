//! Stages of a scripted conversation and the per-session stage pointer.
//!
//! Stages are open-ended string names (`initial`, `device-selection`, ...)
//! because every scenario defines its own closed set. The set is enforced by
//! scenario validation, not by the type.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Named position within a scenario's flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stage(Cow<'static, str>);

impl Stage {
    /// Stage every scenario flow converges on.
    pub const COMPLETE: Stage = Stage::from_static("complete");

    /// Conventional entry stage.
    pub const INITIAL: Stage = Stage::from_static("initial");

    /// Creates a stage from a compile-time name.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a stage from a runtime name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Returns the stage name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Stage {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Tracks the current stage of one session.
///
/// `advance` overwrites the current stage without consulting a transition
/// graph; the only legal transitions are the ones encoded in validated rule
/// tables, so the resolver is the sole caller in practice.
#[derive(Debug, Clone)]
pub struct ConversationStageMachine {
    current: Stage,
    terminal: Stage,
}

impl ConversationStageMachine {
    /// Starts a machine at `entry`.
    pub fn new(entry: Stage, terminal: Stage) -> Self {
        Self {
            current: entry,
            terminal,
        }
    }

    /// Returns the current stage.
    pub fn current(&self) -> &Stage {
        &self.current
    }

    /// Sets the current stage.
    pub fn advance(&mut self, next: Stage) {
        if next != self.current {
            tracing::debug!(from = %self.current, to = %next, "stage advanced");
        }
        self.current = next;
    }

    /// Returns true once the flow has reached its terminal stage.
    pub fn is_terminal(&self) -> bool {
        self.current == self.terminal
    }

    /// Returns the terminal stage.
    pub fn terminal(&self) -> &Stage {
        &self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod stage {
        use super::*;

        #[test]
        fn static_and_owned_names_compare_equal() {
            assert_eq!(Stage::from_static("follow-up"), Stage::new("follow-up"));
            assert_eq!(Stage::COMPLETE, Stage::from("complete"));
        }

        #[test]
        fn serializes_as_plain_string() {
            let json = serde_json::to_string(&Stage::new("instructions")).unwrap();
            assert_eq!(json, "\"instructions\"");
            let back: Stage = serde_json::from_str(&json).unwrap();
            assert_eq!(back.as_str(), "instructions");
        }
    }

    mod machine {
        use super::*;

        #[test]
        fn starts_at_entry_stage() {
            let machine = ConversationStageMachine::new(Stage::INITIAL, Stage::COMPLETE);
            assert_eq!(machine.current(), &Stage::INITIAL);
            assert!(!machine.is_terminal());
        }

        #[test]
        fn advance_overwrites_without_checks() {
            let mut machine = ConversationStageMachine::new(Stage::INITIAL, Stage::COMPLETE);
            machine.advance(Stage::new("anything"));
            assert_eq!(machine.current().as_str(), "anything");
        }

        #[test]
        fn reaching_terminal_is_reported() {
            let mut machine = ConversationStageMachine::new(Stage::INITIAL, Stage::COMPLETE);
            machine.advance(Stage::COMPLETE);
            assert!(machine.is_terminal());
            machine.advance(Stage::COMPLETE);
            assert!(machine.is_terminal());
        }
    }
}
