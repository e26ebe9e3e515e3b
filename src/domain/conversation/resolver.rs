//! First-match-wins lookup over per-stage rule tables.
//!
//! Tables are validated once at construction; a validated resolver answers
//! every input at every stage it knows, falling back to the stage's
//! catch-all rule when nothing more specific matches.

use std::collections::{BTreeMap, BTreeSet};

use super::errors::ScriptError;
use super::input::{ActionId, UserInput};
use super::rule::{ScriptRule, ScriptedReply};
use super::stage::Stage;

/// Outcome of resolving one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub reply: &'a ScriptedReply,
    pub next_stage: &'a Stage,
    /// True when the catch-all rule answered.
    pub fallback: bool,
}

/// Validated rule table for one scenario.
#[derive(Debug, Clone)]
pub struct ScriptedResponseResolver {
    rules: BTreeMap<Stage, Vec<ScriptRule>>,
    terminal: Stage,
}

impl ScriptedResponseResolver {
    /// Groups `rules` by stage (keeping author order) and validates them.
    ///
    /// # Errors
    ///
    /// Returns the first `ScriptError` found, checking stages in name order:
    /// - `EmptyMatcher` for a matcher group with no members
    /// - `BlankKeyword` for an empty or whitespace-only keyword or phrase
    /// - `UnknownAction` if a matcher or offered button is not in `known_actions`
    /// - `MissingFallback` if a stage with rules has no catch-all
    /// - `AdvancingFallback` if a catch-all leaves its stage
    /// - `UnknownTarget` if a rule leads to a stage without rules
    /// - `TerminalEscape` if a rule in the terminal stage leaves it
    pub fn new(
        rules: Vec<ScriptRule>,
        terminal: Stage,
        known_actions: &BTreeSet<ActionId>,
    ) -> Result<Self, ScriptError> {
        let mut grouped: BTreeMap<Stage, Vec<ScriptRule>> = BTreeMap::new();
        for rule in rules {
            grouped.entry(rule.stage.clone()).or_default().push(rule);
        }

        let resolver = Self {
            rules: grouped,
            terminal,
        };
        resolver.validate(known_actions)?;
        Ok(resolver)
    }

    fn validate(&self, known_actions: &BTreeSet<ActionId>) -> Result<(), ScriptError> {
        for (stage, rules) in &self.rules {
            for rule in rules {
                if rule.matcher.has_empty_group() {
                    return Err(ScriptError::EmptyMatcher {
                        stage: stage.clone(),
                    });
                }
                if rule.matcher.has_blank_text() {
                    return Err(ScriptError::BlankKeyword {
                        stage: stage.clone(),
                    });
                }

                let unknown = rule
                    .matcher
                    .referenced_actions()
                    .into_iter()
                    .chain(rule.reply.offered_actions())
                    .find(|id| !known_actions.contains(*id));
                if let Some(action) = unknown {
                    return Err(ScriptError::UnknownAction {
                        stage: stage.clone(),
                        action: action.clone(),
                    });
                }

                if rule.is_fallback() && rule.advances() {
                    return Err(ScriptError::AdvancingFallback {
                        stage: stage.clone(),
                        next: rule.next_stage.clone(),
                    });
                }

                if *stage == self.terminal && rule.advances() {
                    return Err(ScriptError::TerminalEscape {
                        stage: stage.clone(),
                        target: rule.next_stage.clone(),
                    });
                }

                if !self.rules.contains_key(&rule.next_stage) {
                    return Err(ScriptError::UnknownTarget {
                        stage: stage.clone(),
                        target: rule.next_stage.clone(),
                    });
                }
            }

            if !rules.iter().any(ScriptRule::is_fallback) {
                return Err(ScriptError::MissingFallback {
                    stage: stage.clone(),
                });
            }
        }
        Ok(())
    }

    /// Finds the first rule for `stage` that accepts `input`.
    ///
    /// # Errors
    ///
    /// - `UnknownStage` if no rules exist for `stage`
    pub fn resolve(&self, stage: &Stage, input: &UserInput) -> Result<Resolution<'_>, ScriptError> {
        let rules = self
            .rules
            .get(stage)
            .ok_or_else(|| ScriptError::UnknownStage(stage.clone()))?;

        // Validation guarantees a catch-all, so this only misses for
        // tables built without it.
        let rule = rules
            .iter()
            .find(|rule| rule.matcher.matches(input))
            .ok_or_else(|| ScriptError::UnknownStage(stage.clone()))?;

        Ok(Resolution {
            reply: &rule.reply,
            next_stage: &rule.next_stage,
            fallback: rule.is_fallback(),
        })
    }

    /// Returns true if rules exist for `stage`.
    pub fn knows(&self, stage: &Stage) -> bool {
        self.rules.contains_key(stage)
    }

    /// Stages with rules, in name order.
    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.rules.keys()
    }

    pub fn terminal(&self) -> &Stage {
        &self.terminal
    }
}
