//! AppState - Top-level front-end state.
//!
//! Tracks which view is showing (the starter menu or one conversation),
//! whether the help overlay is open, and whether it has been shown before.
//! At most one session is alive at a time; switching away closes it.

use std::sync::Arc;

use thiserror::Error;

use super::pacing::Pacing;
use super::session::{ConversationSession, SessionError};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::scenarios::{ScenarioCatalog, Starter, StarterTarget};
use crate::ports::TicketNumberGenerator;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no starter with id '{0}'")]
    UnknownStarter(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// What the front-end is currently showing.
#[derive(Debug)]
pub enum View {
    Landing,
    Conversation(ConversationSession),
}

/// Result of picking a starter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarterOutcome {
    /// A new conversation is now showing.
    Opened,
    /// The starter points elsewhere; the caller should open this link.
    ExternalLink(String),
}

pub struct AppState {
    catalog: Arc<ScenarioCatalog>,
    pacing: Pacing,
    tickets: Arc<dyn TicketNumberGenerator>,
    help_seen: bool,
    help_visible: bool,
    view: View,
}

impl AppState {
    /// Creates the state on the landing view.
    ///
    /// `help_seen` records whether the help overlay was already shown to
    /// this user; when false, the first call to `take_first_visit_help`
    /// opens it.
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        pacing: Pacing,
        tickets: Arc<dyn TicketNumberGenerator>,
        help_seen: bool,
    ) -> Self {
        Self {
            catalog,
            pacing,
            tickets,
            help_seen,
            help_visible: false,
            view: View::Landing,
        }
    }

    pub fn catalog(&self) -> &Arc<ScenarioCatalog> {
        &self.catalog
    }

    pub fn starters(&self) -> &[Starter] {
        self.catalog.starters()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The active conversation, if one is showing.
    pub fn session(&self) -> Option<&ConversationSession> {
        match &self.view {
            View::Conversation(session) => Some(session),
            View::Landing => None,
        }
    }

    /// Opens the help overlay on the first visit only.
    ///
    /// Returns true exactly once per app lifetime, and never if help was
    /// already seen when the state was created.
    pub fn take_first_visit_help(&mut self) -> bool {
        if self.help_seen {
            return false;
        }
        self.help_seen = true;
        self.help_visible = true;
        true
    }

    pub fn open_help(&mut self) {
        self.help_seen = true;
        self.help_visible = true;
    }

    pub fn close_help(&mut self) {
        self.help_visible = false;
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn help_seen(&self) -> bool {
        self.help_seen
    }

    /// Acts on a starter from the menu.
    ///
    /// Scenario starters close the active conversation and open a new one.
    /// Link starters leave the current view alone and hand the link back.
    ///
    /// # Errors
    ///
    /// - `UnknownStarter` if `id` is not in the menu
    /// - `Session` if the new session cannot be started
    pub async fn select_starter(&mut self, id: &str) -> Result<StarterOutcome, AppError> {
        let starter = self
            .catalog
            .starter(id)
            .ok_or_else(|| AppError::UnknownStarter(id.to_string()))?;

        let scenario_id = match &starter.target {
            StarterTarget::ExternalLink(link) => {
                tracing::info!(starter = id, link = %link, "starter opens external link");
                return Ok(StarterOutcome::ExternalLink(link.clone()));
            }
            StarterTarget::Scenario(scenario_id) => scenario_id.clone(),
        };

        let scenario = self.catalog.scenario(&scenario_id).cloned().ok_or_else(|| {
            SessionError::Domain(
                DomainError::new(ErrorCode::ScenarioNotFound, "starter targets a missing scenario")
                    .with_detail("scenario", scenario_id.as_str()),
            )
        })?;

        self.return_to_landing().await?;
        let session = ConversationSession::start(scenario, self.pacing, self.tickets.as_ref())?;
        self.view = View::Conversation(session);
        Ok(StarterOutcome::Opened)
    }

    /// Closes the active conversation, if any, and shows the starter menu.
    pub async fn return_to_landing(&mut self) -> Result<(), AppError> {
        if let View::Conversation(session) = std::mem::replace(&mut self.view, View::Landing) {
            session.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedTicketNumbers;
    use crate::domain::foundation::SessionStatus;

    fn app(help_seen: bool) -> AppState {
        AppState::new(
            ScenarioCatalog::builtin().unwrap(),
            Pacing::default(),
            Arc::new(FixedTicketNumbers::always("48213")),
            help_seen,
        )
    }

    mod help {
        use super::*;

        #[test]
        fn first_visit_shows_help_once() {
            let mut app = app(false);
            assert!(app.take_first_visit_help());
            assert!(app.help_visible());

            app.close_help();
            assert!(!app.take_first_visit_help());
            assert!(!app.help_visible());
        }

        #[test]
        fn returning_user_does_not_get_help() {
            let mut app = app(true);
            assert!(!app.take_first_visit_help());
            assert!(!app.help_visible());
        }

        #[test]
        fn help_can_be_reopened_manually() {
            let mut app = app(true);
            app.open_help();
            assert!(app.help_visible());
            app.close_help();
            assert!(!app.help_visible());
        }
    }

    mod starters {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn scenario_starter_opens_conversation() {
            let mut app = app(true);
            let outcome = app.select_starter("vpn-connect").await.unwrap();
            assert_eq!(outcome, StarterOutcome::Opened);

            let session = app.session().unwrap();
            assert_eq!(session.scenario().id().as_str(), "vpn-connection");
        }

        #[tokio::test(start_paused = true)]
        async fn link_starter_leaves_view_alone() {
            let mut app = app(true);
            let outcome = app.select_starter("camera-issue").await.unwrap();
            assert_eq!(
                outcome,
                StarterOutcome::ExternalLink("https://aka.ms/Vision_IThelp".to_string())
            );
            assert!(matches!(app.view(), View::Landing));
        }

        #[tokio::test(start_paused = true)]
        async fn unknown_starter_is_rejected() {
            let mut app = app(true);
            let err = app.select_starter("printer").await.unwrap_err();
            assert!(matches!(err, AppError::UnknownStarter(id) if id == "printer"));
        }

        #[tokio::test(start_paused = true)]
        async fn return_to_landing_closes_session() {
            let mut app = app(true);
            app.select_starter("ticket-status").await.unwrap();
            app.return_to_landing().await.unwrap();
            assert!(app.session().is_none());
        }

        #[tokio::test(start_paused = true)]
        async fn switching_starters_replaces_session() {
            let mut app = app(true);
            app.select_starter("ticket-status").await.unwrap();
            let first = *app.session().unwrap().id();

            app.select_starter("kb-article").await.unwrap();
            let session = app.session().unwrap();
            assert_ne!(session.id(), &first);
            assert_eq!(session.status().await, SessionStatus::Active);
            assert_eq!(session.scenario().id().as_str(), "kb-article");
        }
    }
}
