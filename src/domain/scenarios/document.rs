//! YAML representation of scenarios and starters.
//!
//! Documents are flat, strictly-typed mirrors of the files under
//! `scenarios/`. Unknown keys are rejected so that typos in a script fail at
//! load time instead of silently producing a rule that never fires.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::domain::conversation::{
    ActionId, Matcher, MessageBody, Opening, QuickAction, ReplyPart, ScenarioParts, ScriptError,
    ScriptRule, ScriptedReply, Stage,
};
use crate::domain::foundation::ScenarioId;

/// One scenario file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioDocument {
    pub id: ScenarioId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub entry: Stage,
    pub terminal: Stage,
    #[serde(default)]
    pub actions: Vec<ActionDocument>,
    pub opening: OpeningDocument,
    #[serde(default)]
    pub suggestions: BTreeMap<Stage, Vec<String>>,
    pub rules: Vec<RuleDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionDocument {
    pub id: ActionId,
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningDocument {
    #[serde(default)]
    pub user: Option<String>,
    /// Defaults to the scenario's entry stage.
    #[serde(default)]
    pub next: Option<Stage>,
    pub reply: Vec<ReplyPartDocument>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDocument {
    pub stages: Vec<Stage>,
    /// Absent for catch-all rules.
    #[serde(default)]
    pub when: Option<WhenDocument>,
    /// Absent to stay on the current stage.
    #[serde(default)]
    pub next: Option<Stage>,
    pub reply: Vec<ReplyPartDocument>,
}

/// Match conditions. Button tokens and exact phrases are alternatives; the
/// keyword groups form one more alternative in which any of `keywords` and
/// all of `requires` must appear.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhenDocument {
    #[serde(default)]
    pub actions: Vec<ActionId>,
    #[serde(default)]
    pub equals: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyPartDocument {
    #[serde(default)]
    pub after_ms: u64,
    pub text: String,
    #[serde(default)]
    pub actions: Vec<ActionId>,
}

/// One starter menu entry; exactly one of `scenario` and `link` is set.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StarterDocument {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scenario: Option<ScenarioId>,
    #[serde(default)]
    pub link: Option<String>,
}

impl WhenDocument {
    /// Builds the matcher these conditions describe.
    pub fn into_matcher(self) -> Matcher {
        let mut alternatives: Vec<Matcher> = self.actions.into_iter().map(Matcher::Action).collect();
        alternatives.extend(self.equals.into_iter().map(Matcher::equals));

        let mut text_group = Vec::new();
        if !self.keywords.is_empty() {
            text_group.push(Matcher::AnyOf(
                self.keywords.into_iter().map(Matcher::contains).collect(),
            ));
        }
        text_group.extend(self.requires.into_iter().map(Matcher::contains));

        match text_group.len() {
            0 => {}
            1 => alternatives.extend(text_group),
            _ => alternatives.push(Matcher::AllOf(text_group)),
        }

        if alternatives.len() == 1 {
            return alternatives.remove(0);
        }
        Matcher::AnyOf(alternatives)
    }
}

impl ScenarioDocument {
    /// Parses one scenario file.
    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    /// Converts the document into validated scenario parts.
    ///
    /// # Errors
    ///
    /// - `RuleWithoutStages` for a rule with an empty `stages` list
    /// - `UnknownAction` when a reply offers an undeclared button
    /// - `EmptyReply` / `BlankReplyText` for empty replies
    pub fn into_parts(self) -> Result<ScenarioParts, ScriptError> {
        let actions: Vec<QuickAction> = self
            .actions
            .into_iter()
            .map(|a| QuickAction {
                id: a.id,
                label: a.label,
            })
            .collect();
        let labels: BTreeMap<&ActionId, &str> =
            actions.iter().map(|a| (&a.id, a.label.as_str())).collect();

        let opening = Opening {
            user: self.opening.user,
            reply: build_reply(&self.entry, self.opening.reply, &labels)?,
            next: self.opening.next.unwrap_or_else(|| self.entry.clone()),
        };

        let mut rules = Vec::new();
        for (index, rule) in self.rules.into_iter().enumerate() {
            if rule.stages.is_empty() {
                return Err(ScriptError::RuleWithoutStages { index });
            }
            let matcher = rule.when.map(WhenDocument::into_matcher).unwrap_or(Matcher::Any);
            for stage in rule.stages {
                rules.push(ScriptRule {
                    reply: build_reply(&stage, rule.reply.clone(), &labels)?,
                    matcher: matcher.clone(),
                    next_stage: rule.next.clone().unwrap_or_else(|| stage.clone()),
                    stage,
                });
            }
        }

        Ok(ScenarioParts {
            id: self.id,
            title: self.title,
            description: self.description,
            entry: self.entry,
            terminal: self.terminal,
            actions,
            opening,
            rules,
            suggestions: self.suggestions,
        })
    }
}

fn build_reply(
    stage: &Stage,
    parts: Vec<ReplyPartDocument>,
    labels: &BTreeMap<&ActionId, &str>,
) -> Result<ScriptedReply, ScriptError> {
    let mut built = Vec::with_capacity(parts.len());
    for part in parts {
        let mut offered = Vec::with_capacity(part.actions.len());
        for id in part.actions {
            let label = labels.get(&id).ok_or_else(|| ScriptError::UnknownAction {
                stage: stage.clone(),
                action: id.clone(),
            })?;
            offered.push(QuickAction {
                label: (*label).to_string(),
                id,
            });
        }
        built.push(ReplyPart::new(
            Duration::from_millis(part.after_ms),
            MessageBody::text(part.text.trim_end()).with_actions(offered),
        ));
    }
    ScriptedReply::new(stage, built)
}
