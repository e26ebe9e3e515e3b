//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, lifecycle enums, errors)
//! - `conversation` - Messages, stages, rule tables, resolver, transcript, delivery queue
//! - `scenarios` - Built-in scripted scenarios and the starter menu

pub mod conversation;
pub mod foundation;
pub mod scenarios;
