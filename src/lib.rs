//! Copilot Script - Scripted IT helpdesk conversations
//!
//! This crate plays pre-authored helpdesk conversations: each scenario is a
//! rule table mapping user input to canned replies and stage transitions,
//! delivered with human-like delays into an append-only transcript.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
