//! Authoring and lookup errors for scripted rule tables.

use thiserror::Error;

use super::input::ActionId;
use super::stage::Stage;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Defect in a rule table, detected when the table is loaded.
///
/// `UnknownStage` is the only variant that can surface at runtime, and only
/// for tables that skipped validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("stage '{stage}' has rules but no catch-all rule")]
    MissingFallback { stage: Stage },

    #[error("catch-all rule for stage '{stage}' advances to '{next}'")]
    AdvancingFallback { stage: Stage, next: Stage },

    #[error("rule in stage '{stage}' targets '{target}', which has no rules")]
    UnknownTarget { stage: Stage, target: Stage },

    #[error("terminal stage '{stage}' has a rule leading to '{target}'")]
    TerminalEscape { stage: Stage, target: Stage },

    #[error("rule in stage '{stage}' has an empty reply")]
    EmptyReply { stage: Stage },

    #[error("rule in stage '{stage}' has a reply part with blank text")]
    BlankReplyText { stage: Stage },

    #[error("rule in stage '{stage}' has an empty matcher group")]
    EmptyMatcher { stage: Stage },

    #[error("rule in stage '{stage}' has a blank keyword or phrase")]
    BlankKeyword { stage: Stage },

    #[error("stage '{stage}' references unknown action '{action}'")]
    UnknownAction { stage: Stage, action: ActionId },

    #[error("rule #{index} applies to no stages")]
    RuleWithoutStages { index: usize },

    #[error("no rules defined for stage '{0}'")]
    UnknownStage(Stage),
}

impl From<ScriptError> for DomainError {
    fn from(err: ScriptError) -> Self {
        let code = match &err {
            ScriptError::UnknownStage(_) => ErrorCode::StageNotFound,
            ScriptError::UnknownAction { .. } => ErrorCode::ActionNotFound,
            _ => ErrorCode::InvalidScript,
        };
        DomainError::new(code, err.to_string())
    }
}
