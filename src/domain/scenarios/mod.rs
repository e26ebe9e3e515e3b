//! Scenario catalog module.
//!
//! Loads the built-in scripted conversations from embedded YAML and exposes
//! them, with the landing-page starter menu, as a validated catalog.

mod catalog;
mod document;

pub use catalog::{
    CatalogError, ScenarioCatalog, Starter, StarterTarget, BUILTIN_SCENARIOS, BUILTIN_STARTERS,
};
pub use document::{
    ActionDocument, OpeningDocument, ReplyPartDocument, RuleDocument, ScenarioDocument,
    StarterDocument, WhenDocument,
};
