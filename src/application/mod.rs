//! Application layer - Sessions and front-end state.
//!
//! Orchestrates the conversation domain over time: `ConversationSession`
//! plays one scenario with real delays, `AppState` decides which session
//! is showing.

mod app_state;
mod pacing;
mod session;

pub use app_state::{AppError, AppState, StarterOutcome, View};
pub use pacing::Pacing;
pub use session::{ConversationSession, SessionError, SubmitReceipt};
