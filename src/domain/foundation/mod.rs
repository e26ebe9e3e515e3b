//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, lifecycle enums, and error types
//! used by every scripted conversation.

mod errors;
mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ScenarioId, SessionId};
pub use session_status::SessionStatus;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
