//! Script rules: what to match, what to reply, and where to go next.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ScriptError;
use super::input::{ActionId, UserInput};
use super::message::MessageBody;
use super::stage::Stage;

/// Placeholder substituted with the session's ticket number.
pub const TICKET_ID_PLACEHOLDER: &str = "{ticket_id}";

/// Predicate over user input.
///
/// Text predicates compare case-insensitively against trimmed input and never
/// accept button tokens; `Action` only accepts button tokens. `Any` accepts
/// both and marks a catch-all rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    Any,
    Action(ActionId),
    Equals(String),
    Contains(String),
    AnyOf(Vec<Matcher>),
    AllOf(Vec<Matcher>),
}

impl Matcher {
    /// Whole-input equality, ignoring case and surrounding whitespace.
    pub fn equals(text: impl Into<String>) -> Self {
        Self::Equals(normalize(&text.into()))
    }

    /// Keyword containment, ignoring case.
    pub fn contains(keyword: impl Into<String>) -> Self {
        Self::Contains(normalize(&keyword.into()))
    }

    /// Returns true if this matcher accepts the input.
    pub fn matches(&self, input: &UserInput) -> bool {
        let subject = match input {
            UserInput::Text(text) => Subject::Text(normalize(text)),
            UserInput::Action(id) => Subject::Action(id),
        };
        self.accepts(&subject)
    }

    /// Returns true for the catch-all matcher.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Collects every action token this matcher compares against.
    pub fn referenced_actions(&self) -> Vec<&ActionId> {
        let mut out = Vec::new();
        self.collect_actions(&mut out);
        out
    }

    /// Returns true if any nested group is empty.
    pub fn has_empty_group(&self) -> bool {
        match self {
            Self::AnyOf(items) | Self::AllOf(items) => {
                items.is_empty() || items.iter().any(Matcher::has_empty_group)
            }
            _ => false,
        }
    }

    /// Returns true if any text predicate is blank, which would accept
    /// every input.
    pub fn has_blank_text(&self) -> bool {
        match self {
            Self::Equals(text) | Self::Contains(text) => text.is_empty(),
            Self::AnyOf(items) | Self::AllOf(items) => items.iter().any(Matcher::has_blank_text),
            Self::Any | Self::Action(_) => false,
        }
    }

    fn accepts(&self, subject: &Subject<'_>) -> bool {
        match (self, subject) {
            (Self::Any, _) => true,
            (Self::Action(expected), Subject::Action(actual)) => expected == *actual,
            (Self::Equals(expected), Subject::Text(text)) => text == expected,
            (Self::Contains(keyword), Subject::Text(text)) => text.contains(keyword.as_str()),
            (Self::AnyOf(items), _) => items.iter().any(|m| m.accepts(subject)),
            (Self::AllOf(items), _) => {
                !items.is_empty() && items.iter().all(|m| m.accepts(subject))
            }
            _ => false,
        }
    }

    fn collect_actions<'a>(&'a self, out: &mut Vec<&'a ActionId>) {
        match self {
            Self::Action(id) => out.push(id),
            Self::AnyOf(items) | Self::AllOf(items) => {
                for item in items {
                    item.collect_actions(out);
                }
            }
            _ => {}
        }
    }
}

enum Subject<'a> {
    Text(String),
    Action(&'a ActionId),
}

/// Lowercases, trims, and folds typographic apostrophes.
fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace('\u{2019}', "'")
}

/// One timed piece of a scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyPart {
    /// Delay measured from the triggering input.
    pub after: Duration,
    pub body: MessageBody,
}

impl ReplyPart {
    pub fn new(after: Duration, body: MessageBody) -> Self {
        Self { after, body }
    }

    /// Renders the body, substituting reply variables.
    pub fn render(&self, ticket_id: &str) -> MessageBody {
        let text = self.body.as_text();
        if !text.contains(TICKET_ID_PLACEHOLDER) {
            return self.body.clone();
        }
        MessageBody::text(text.replace(TICKET_ID_PLACEHOLDER, ticket_id))
            .with_actions(self.body.actions().to_vec())
    }
}

/// Ordered, non-empty sequence of reply parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedReply(Vec<ReplyPart>);

impl ScriptedReply {
    /// Builds a reply, rejecting empty part lists and blank text.
    pub fn new(stage: &Stage, parts: Vec<ReplyPart>) -> Result<Self, ScriptError> {
        if parts.is_empty() {
            return Err(ScriptError::EmptyReply {
                stage: stage.clone(),
            });
        }
        if parts.iter().any(|p| p.body.as_text().trim().is_empty()) {
            return Err(ScriptError::BlankReplyText {
                stage: stage.clone(),
            });
        }
        Ok(Self(parts))
    }

    /// Single-part reply.
    pub fn single(stage: &Stage, after: Duration, body: MessageBody) -> Result<Self, ScriptError> {
        Self::new(stage, vec![ReplyPart::new(after, body)])
    }

    pub fn parts(&self) -> &[ReplyPart] {
        &self.0
    }

    /// Every action token the reply offers as a button.
    pub fn offered_actions(&self) -> impl Iterator<Item = &ActionId> {
        self.0
            .iter()
            .flat_map(|p| p.body.actions().iter().map(|a| &a.id))
    }
}

/// Static rule: in `stage`, if `matcher` accepts the input, reply and move on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRule {
    pub stage: Stage,
    pub matcher: Matcher,
    pub reply: ScriptedReply,
    pub next_stage: Stage,
}

impl ScriptRule {
    /// Returns true if this is a catch-all rule.
    pub fn is_fallback(&self) -> bool {
        self.matcher.is_fallback()
    }

    /// Returns true if firing this rule leaves the current stage.
    pub fn advances(&self) -> bool {
        self.next_stage != self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::message::QuickAction;

    fn action(id: &str) -> ActionId {
        ActionId::new(id).unwrap()
    }

    mod matcher {
        use super::*;

        #[test]
        fn any_accepts_text_and_actions() {
            assert!(Matcher::Any.matches(&UserInput::text("whatever")));
            assert!(Matcher::Any.matches(&UserInput::action(action("windows"))));
        }

        #[test]
        fn action_uses_exact_token_equality() {
            let m = Matcher::Action(action("windows"));
            assert!(m.matches(&UserInput::action(action("windows"))));
            assert!(!m.matches(&UserInput::action(action("Windows"))));
            assert!(!m.matches(&UserInput::text("windows")));
        }

        #[test]
        fn equals_ignores_case_and_padding() {
            let m = Matcher::equals("Mac");
            assert!(m.matches(&UserInput::text("  mAC ")));
            assert!(!m.matches(&UserInput::text("my mac")));
        }

        #[test]
        fn contains_is_case_insensitive_substring() {
            let m = Matcher::contains("pre-shared key");
            assert!(m.matches(&UserInput::text("I don't know the Pre-Shared Key")));
            assert!(!m.matches(&UserInput::action(action("pre-shared"))));
        }

        #[test]
        fn contains_folds_typographic_apostrophes() {
            let m = Matcher::contains("don't know");
            assert!(m.matches(&UserInput::text("I don\u{2019}t know")));
        }

        #[test]
        fn all_of_requires_every_keyword() {
            let m = Matcher::AllOf(vec![Matcher::contains("why"), Matcher::contains("long")]);
            assert!(m.matches(&UserInput::text("Why is this taking so long?")));
            assert!(!m.matches(&UserInput::text("why?")));
        }

        #[test]
        fn empty_groups_never_match() {
            assert!(!Matcher::AllOf(vec![]).matches(&UserInput::text("x")));
            assert!(!Matcher::AnyOf(vec![]).matches(&UserInput::text("x")));
            assert!(Matcher::AnyOf(vec![Matcher::AllOf(vec![])]).has_empty_group());
        }

        #[test]
        fn whitespace_keyword_is_blank() {
            let m = Matcher::AllOf(vec![Matcher::contains("vpn"), Matcher::contains(" \t ")]);
            assert!(m.has_blank_text());
            assert!(Matcher::equals("").has_blank_text());
            assert!(!Matcher::contains("vpn").has_blank_text());
            assert!(!Matcher::Any.has_blank_text());
        }

        #[test]
        fn referenced_actions_walks_groups() {
            let m = Matcher::AnyOf(vec![
                Matcher::Action(action("windows")),
                Matcher::AllOf(vec![Matcher::Action(action("macos"))]),
                Matcher::contains("mobile"),
            ]);
            let ids: Vec<&str> = m.referenced_actions().into_iter().map(ActionId::as_str).collect();
            assert_eq!(ids, vec!["windows", "macos"]);
        }
    }

    mod reply {
        use super::*;

        #[test]
        fn rejects_empty_parts() {
            let err = ScriptedReply::new(&Stage::INITIAL, vec![]).unwrap_err();
            assert!(matches!(err, ScriptError::EmptyReply { .. }));
        }

        #[test]
        fn rejects_blank_text() {
            let err = ScriptedReply::single(&Stage::INITIAL, Duration::ZERO, MessageBody::text(" "))
                .unwrap_err();
            assert!(matches!(err, ScriptError::BlankReplyText { .. }));
        }

        #[test]
        fn render_substitutes_ticket_id_and_keeps_actions() {
            let part = ReplyPart::new(
                Duration::from_millis(500),
                MessageBody::text("Ticket ID: {ticket_id}").with_actions(vec![QuickAction {
                    id: action("check"),
                    label: "Check".to_string(),
                }]),
            );
            let body = part.render("48213");
            assert_eq!(body.as_text(), "Ticket ID: 48213");
            assert_eq!(body.actions().len(), 1);
        }

        #[test]
        fn offered_actions_lists_buttons_in_order() {
            let body = MessageBody::text("Pick one").with_actions(vec![
                QuickAction { id: action("a"), label: "A".into() },
                QuickAction { id: action("b"), label: "B".into() },
            ]);
            let reply = ScriptedReply::single(&Stage::INITIAL, Duration::ZERO, body).unwrap();
            let ids: Vec<&str> = reply.offered_actions().map(ActionId::as_str).collect();
            assert_eq!(ids, vec!["a", "b"]);
        }
    }
}
