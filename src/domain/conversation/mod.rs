//! Conversation domain module.
//!
//! Scripted helpdesk dialogues: messages, stages, rule tables, the
//! first-match resolver, the append-only transcript, and the timed delivery
//! queue that paces bot replies.

mod delivery_queue;
mod errors;
mod input;
mod message;
mod resolver;
mod rule;
mod scenario;
mod stage;
mod transcript;

pub use delivery_queue::TimedMessageQueue;
pub use errors::ScriptError;
pub use input::{ActionId, UserInput};
pub use message::{Message, MessageBody, MessageId, QuickAction, Sender};
pub use resolver::{Resolution, ScriptedResponseResolver};
pub use rule::{Matcher, ReplyPart, ScriptRule, ScriptedReply, TICKET_ID_PLACEHOLDER};
pub use scenario::{Opening, Scenario, ScenarioParts};
pub use stage::{ConversationStageMachine, Stage};
pub use transcript::TranscriptStore;
