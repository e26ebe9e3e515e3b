//! Scenario: a validated, self-contained scripted conversation.
//!
//! A scenario bundles the rule table, the scripted opening exchange, the
//! buttons it may offer, and the prompt suggestions shown per stage.

use std::collections::{BTreeMap, BTreeSet};

use super::errors::ScriptError;
use super::input::ActionId;
use super::message::QuickAction;
use super::resolver::ScriptedResponseResolver;
use super::rule::{ScriptRule, ScriptedReply};
use super::stage::Stage;
use crate::domain::foundation::ScenarioId;

/// Exchange injected when a session starts with an empty transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    /// Scripted user line; `None` for bot-first scenarios.
    pub user: Option<String>,
    pub reply: ScriptedReply,
    /// Stage the session moves to once the opening is scheduled.
    pub next: Stage,
}

/// Everything needed to run one scripted conversation.
#[derive(Debug, Clone)]
pub struct Scenario {
    id: ScenarioId,
    title: String,
    description: String,
    entry: Stage,
    actions: BTreeMap<ActionId, String>,
    opening: Opening,
    resolver: ScriptedResponseResolver,
    suggestions: BTreeMap<Stage, Vec<String>>,
}

/// Unvalidated parts of a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioParts {
    pub id: ScenarioId,
    pub title: String,
    pub description: String,
    pub entry: Stage,
    pub terminal: Stage,
    pub actions: Vec<QuickAction>,
    pub opening: Opening,
    pub rules: Vec<ScriptRule>,
    pub suggestions: BTreeMap<Stage, Vec<String>>,
}

impl Scenario {
    /// Validates and assembles a scenario.
    ///
    /// # Errors
    ///
    /// Any rule-table defect reported by `ScriptedResponseResolver::new`, plus:
    /// - `UnknownTarget` if the opening leads to a stage without rules
    /// - `UnknownAction` if the opening offers an undeclared button
    /// - `UnknownStage` if suggestions are keyed by a stage without rules
    pub fn new(parts: ScenarioParts) -> Result<Self, ScriptError> {
        let actions: BTreeMap<ActionId, String> = parts
            .actions
            .into_iter()
            .map(|action| (action.id, action.label))
            .collect();
        let known: BTreeSet<ActionId> = actions.keys().cloned().collect();

        let resolver = ScriptedResponseResolver::new(parts.rules, parts.terminal, &known)?;

        if !resolver.knows(&parts.opening.next) {
            return Err(ScriptError::UnknownTarget {
                stage: parts.entry,
                target: parts.opening.next,
            });
        }
        if let Some(action) = parts
            .opening
            .reply
            .offered_actions()
            .find(|id| !known.contains(*id))
        {
            return Err(ScriptError::UnknownAction {
                stage: parts.entry,
                action: action.clone(),
            });
        }
        if let Some(stage) = parts.suggestions.keys().find(|s| !resolver.knows(s)) {
            return Err(ScriptError::UnknownStage(stage.clone()));
        }

        Ok(Self {
            id: parts.id,
            title: parts.title,
            description: parts.description,
            entry: parts.entry,
            actions,
            opening: parts.opening,
            resolver,
            suggestions: parts.suggestions,
        })
    }

    pub fn id(&self) -> &ScenarioId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stage a fresh session starts in, before the opening is applied.
    pub fn entry(&self) -> &Stage {
        &self.entry
    }

    pub fn terminal(&self) -> &Stage {
        self.resolver.terminal()
    }

    pub fn opening(&self) -> &Opening {
        &self.opening
    }

    pub fn resolver(&self) -> &ScriptedResponseResolver {
        &self.resolver
    }

    /// Label shown for an action button, if the scenario declares it.
    pub fn action_label(&self, id: &ActionId) -> Option<&str> {
        self.actions.get(id).map(String::as_str)
    }

    /// Suggested prompts for `stage`, empty when none are authored.
    pub fn suggestions(&self, stage: &Stage) -> &[String] {
        self.suggestions.get(stage).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::message::MessageBody;
    use crate::domain::conversation::rule::Matcher;
    use std::time::Duration;

    fn reply(stage: &Stage, text: &str) -> ScriptedReply {
        ScriptedReply::single(stage, Duration::from_millis(800), MessageBody::text(text)).unwrap()
    }

    fn parts() -> ScenarioParts {
        let choose = Stage::new("choose");
        ScenarioParts {
            id: ScenarioId::new("demo").unwrap(),
            title: "Demo".to_string(),
            description: "A tiny flow".to_string(),
            entry: Stage::INITIAL,
            terminal: Stage::COMPLETE,
            actions: vec![QuickAction {
                id: ActionId::new("yes").unwrap(),
                label: "Yes please".to_string(),
            }],
            opening: Opening {
                user: Some("Hello".to_string()),
                reply: reply(&Stage::INITIAL, "Shall we?"),
                next: choose.clone(),
            },
            rules: vec![
                ScriptRule {
                    stage: choose.clone(),
                    matcher: Matcher::Action(ActionId::new("yes").unwrap()),
                    reply: reply(&choose, "Done"),
                    next_stage: Stage::COMPLETE,
                },
                ScriptRule {
                    stage: choose.clone(),
                    matcher: Matcher::Any,
                    reply: reply(&choose, "Shall we?"),
                    next_stage: choose.clone(),
                },
                ScriptRule {
                    stage: Stage::COMPLETE,
                    matcher: Matcher::Any,
                    reply: reply(&Stage::COMPLETE, "Anything else?"),
                    next_stage: Stage::COMPLETE,
                },
            ],
            suggestions: BTreeMap::from([(choose, vec!["Yes".to_string()])]),
        }
    }

    #[test]
    fn valid_parts_build_a_scenario() {
        let scenario = Scenario::new(parts()).unwrap();
        assert_eq!(scenario.id().as_str(), "demo");
        assert_eq!(scenario.terminal(), &Stage::COMPLETE);
        assert_eq!(
            scenario.action_label(&ActionId::new("yes").unwrap()),
            Some("Yes please")
        );
        assert_eq!(scenario.suggestions(&Stage::new("choose")), ["Yes".to_string()]);
        assert!(scenario.suggestions(&Stage::COMPLETE).is_empty());
    }

    #[test]
    fn opening_must_lead_to_a_stage_with_rules() {
        let mut p = parts();
        p.opening.next = Stage::new("nowhere");
        assert!(matches!(
            Scenario::new(p),
            Err(ScriptError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn opening_buttons_must_be_declared() {
        let mut p = parts();
        p.opening.reply = ScriptedReply::single(
            &Stage::INITIAL,
            Duration::ZERO,
            MessageBody::text("Pick").with_actions(vec![QuickAction {
                id: ActionId::new("maybe").unwrap(),
                label: "Maybe".into(),
            }]),
        )
        .unwrap();
        assert!(matches!(
            Scenario::new(p),
            Err(ScriptError::UnknownAction { .. })
        ));
    }

    #[test]
    fn suggestions_for_unknown_stage_are_rejected() {
        let mut p = parts();
        p.suggestions.insert(Stage::new("ghost"), vec!["Boo".into()]);
        assert!(matches!(Scenario::new(p), Err(ScriptError::UnknownStage(_))));
    }
}
