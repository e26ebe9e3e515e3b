//! ConversationSession - One live scripted conversation.
//!
//! A session owns the stage machine, transcript, and delivery queue for one
//! scenario. Input is resolved and its reply scheduled immediately; a driver
//! task moves messages from the queue into the transcript as they fall due.
//!
//! ## Teardown
//!
//! Closing (or dropping) a session cancels its root token. The driver drains
//! and appends while holding the queue lock, and `close` takes that same lock
//! after cancelling, so no message reaches the transcript once `close` returns.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{watch, Mutex, Notify, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use super::pacing::Pacing;
use crate::domain::conversation::{
    ActionId, ConversationStageMachine, Message, Scenario, ScriptError, ScriptedReply, Stage,
    TimedMessageQueue, TranscriptStore, UserInput,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, SessionStatus, StateMachine, ValidationError,
};
use crate::ports::TicketNumberGenerator;

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("input is empty")]
    EmptyInput,

    #[error("scenario has no action '{0}'")]
    UnknownAction(ActionId),

    #[error("session is closed")]
    Closed,

    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Domain(err.into())
    }
}

impl From<SessionError> for DomainError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::EmptyInput => DomainError::new(ErrorCode::EmptyField, err.to_string()),
            SessionError::UnknownAction(_) => {
                DomainError::new(ErrorCode::ActionNotFound, err.to_string())
            }
            SessionError::Closed => DomainError::new(ErrorCode::SessionClosed, err.to_string()),
            SessionError::Script(script) => script.into(),
            SessionError::Domain(domain) => domain,
        }
    }
}

/// Outcome of a successful `submit`.
#[derive(Debug, Clone)]
pub struct SubmitReceipt {
    /// Stage the session moved to.
    pub next_stage: Stage,
    /// Whether the stage's catch-all rule answered.
    pub fallback: bool,
    /// One token per scheduled message: the echo first, then each reply part.
    pub deliveries: Vec<CancellationToken>,
}

#[derive(Debug)]
struct SessionShared {
    queue: Mutex<TimedMessageQueue>,
    transcript: RwLock<TranscriptStore>,
    stage: Mutex<ConversationStageMachine>,
    status: RwLock<SessionStatus>,
    wake: Notify,
    /// Transcript length after each delivery.
    delivered: watch::Sender<usize>,
    /// Live queue length after each drain.
    drained: watch::Sender<usize>,
}

impl SessionShared {
    /// Moves every due message into the transcript.
    async fn deliver_due(&self) {
        let mut queue = self.queue.lock().await;
        if queue.is_closed() {
            return;
        }

        let ready = queue.drain_due(Instant::now());
        if !ready.is_empty() {
            let mut transcript = self.transcript.write().await;
            for message in ready {
                tracing::debug!(
                    message_id = %message.id(),
                    sender = message.sender().display_name(),
                    "delivered message"
                );
                transcript.append(message.delivered_now());
            }
            self.delivered.send_replace(transcript.len());
        }
        self.drained.send_replace(queue.len());
    }
}

/// A running conversation for one scenario.
#[derive(Debug)]
pub struct ConversationSession {
    id: SessionId,
    scenario: Arc<Scenario>,
    pacing: Pacing,
    ticket_id: String,
    shared: Arc<SessionShared>,
    cancel: CancellationToken,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl ConversationSession {
    /// Starts a fresh session and its delivery driver.
    ///
    /// The scripted opening is played straight away: the opening user line
    /// (if the scenario has one) is appended, the opening reply is scheduled,
    /// and the stage moves to the opening's target.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        scenario: Arc<Scenario>,
        pacing: Pacing,
        tickets: &dyn TicketNumberGenerator,
    ) -> Result<Self, SessionError> {
        let id = SessionId::new();
        let ticket_id = tickets.next_ticket_number();
        let cancel = CancellationToken::new();

        let mut queue = TimedMessageQueue::with_root(cancel.clone());
        let mut transcript = TranscriptStore::new();
        let mut stage =
            ConversationStageMachine::new(scenario.entry().clone(), scenario.terminal().clone());

        if transcript.is_empty() {
            let opening = scenario.opening();
            if let Some(line) = &opening.user {
                transcript.append(Message::user(line.clone())?);
            }
            schedule_reply(&mut queue, &opening.reply, pacing, &ticket_id)?;
            stage.advance(opening.next.clone());
        }

        let (delivered, _) = watch::channel(transcript.len());
        let (drained, _) = watch::channel(queue.len());
        let shared = Arc::new(SessionShared {
            queue: Mutex::new(queue),
            transcript: RwLock::new(transcript),
            stage: Mutex::new(stage),
            status: RwLock::new(SessionStatus::Active),
            wake: Notify::new(),
            delivered,
            drained,
        });

        let driver = tokio::spawn(drive(Arc::clone(&shared), cancel.clone()));

        tracing::info!(
            session_id = %id,
            scenario = %scenario.id(),
            ticket_id = %ticket_id,
            "conversation session started"
        );

        Ok(Self {
            id,
            scenario,
            pacing,
            ticket_id,
            shared,
            cancel,
            driver: Mutex::new(Some(driver)),
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn scenario(&self) -> &Arc<Scenario> {
        &self.scenario
    }

    /// Ticket number substituted into this session's replies.
    pub fn ticket_id(&self) -> &str {
        &self.ticket_id
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    pub async fn status(&self) -> SessionStatus {
        *self.shared.status.read().await
    }

    /// Resolves `input` against the current stage and schedules the exchange.
    ///
    /// The echo of the input is scheduled with zero delay, followed by every
    /// reply part. Button clicks are echoed with the button's label.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` for blank text
    /// - `UnknownAction` for a button the scenario does not declare
    /// - `Closed` once the session has been torn down
    pub async fn submit(&self, input: UserInput) -> Result<SubmitReceipt, SessionError> {
        if input.is_blank() {
            return Err(SessionError::EmptyInput);
        }
        let echo = match &input {
            UserInput::Text(text) => text.trim().to_string(),
            UserInput::Action(id) => self
                .scenario
                .action_label(id)
                .ok_or_else(|| SessionError::UnknownAction(id.clone()))?
                .to_string(),
        };

        let mut queue = self.shared.queue.lock().await;
        if queue.is_closed() {
            return Err(SessionError::Closed);
        }
        let mut stage = self.shared.stage.lock().await;
        let from = stage.current().clone();

        let resolution = self.scenario.resolver().resolve(&from, &input)?;
        let echo = Message::user(echo)?;

        let mut deliveries = vec![queue.schedule(echo, Duration::ZERO)];
        deliveries.extend(schedule_reply(
            &mut queue,
            resolution.reply,
            self.pacing,
            &self.ticket_id,
        )?);

        let next_stage = resolution.next_stage.clone();
        let fallback = resolution.fallback;
        stage.advance(next_stage.clone());
        drop(stage);
        drop(queue);
        self.shared.wake.notify_one();

        tracing::info!(
            session_id = %self.id,
            from = %from,
            to = %next_stage,
            fallback,
            scheduled = deliveries.len(),
            "input resolved"
        );

        Ok(SubmitReceipt {
            next_stage,
            fallback,
            deliveries,
        })
    }

    /// Snapshot of every delivered message, oldest first.
    pub async fn transcript(&self) -> Vec<Message> {
        self.shared.transcript.read().await.all().to_vec()
    }

    /// Delivered messages from `index` onwards.
    pub async fn messages_since(&self, index: usize) -> Vec<Message> {
        self.shared
            .transcript
            .read()
            .await
            .messages_since(index)
            .to_vec()
    }

    pub async fn stage(&self) -> Stage {
        self.shared.stage.lock().await.current().clone()
    }

    /// Suggested prompts for the current stage.
    pub async fn suggestions(&self) -> Vec<String> {
        let stage = self.stage().await;
        self.scenario.suggestions(&stage).to_vec()
    }

    /// Number of scheduled messages not yet delivered or cancelled.
    pub async fn pending_deliveries(&self) -> usize {
        self.shared.queue.lock().await.len()
    }

    /// Watches the transcript length; changes after every delivery.
    pub fn updates(&self) -> watch::Receiver<usize> {
        self.shared.delivered.subscribe()
    }

    /// Waits until nothing is pending or the session is closed.
    pub async fn settled(&self) {
        let mut drained = self.shared.drained.subscribe();
        loop {
            drained.borrow_and_update();
            let next_due = {
                let queue = self.shared.queue.lock().await;
                if queue.is_empty() {
                    return;
                }
                queue.next_due()
            };

            // Past-due entries are drained by the driver, which reports back.
            let wait_due = async move {
                match next_due {
                    Some(due) if due > Instant::now() => time::sleep_until(due).await,
                    _ => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = drained.changed() => {}
                _ = wait_due => {}
            }
        }
    }

    /// Tears the session down.
    ///
    /// Pending deliveries are cancelled and the driver is joined. Closing
    /// twice is a no-op.
    pub async fn close(&self) -> Result<(), SessionError> {
        {
            let mut status = self.shared.status.write().await;
            if !status.is_open() {
                return Ok(());
            }
            *status = status.transition_to(SessionStatus::Closed)?;
        }

        self.cancel.cancel();
        {
            let mut queue = self.shared.queue.lock().await;
            queue.cancel_all();
            self.shared.drained.send_replace(0);
        }

        if let Some(driver) = self.driver.lock().await.take() {
            if let Err(err) = driver.await {
                tracing::warn!(session_id = %self.id, error = %err, "delivery driver ended abnormally");
            }
        }

        tracing::info!(session_id = %self.id, scenario = %self.scenario.id(), "conversation session closed");
        Ok(())
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Schedules every part of `reply`, rendering the ticket placeholder.
fn schedule_reply(
    queue: &mut TimedMessageQueue,
    reply: &ScriptedReply,
    pacing: Pacing,
    ticket_id: &str,
) -> Result<Vec<CancellationToken>, DomainError> {
    let mut tokens = Vec::with_capacity(reply.parts().len());
    for part in reply.parts() {
        let message = Message::bot(part.render(ticket_id))?;
        tokens.push(queue.schedule(message, pacing.scale(part.after)));
    }
    Ok(tokens)
}

/// Delivery loop: sleeps until the front entry is due, wakes early when new
/// work is scheduled, and stops when the session is cancelled.
async fn drive(shared: Arc<SessionShared>, cancel: CancellationToken) {
    loop {
        let next_due = shared.queue.lock().await.next_due();
        let due = async move {
            match next_due {
                Some(due) => time::sleep_until(due).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = shared.wake.notified() => {}
            _ = due => {}
        }

        shared.deliver_due().await;
    }
    tracing::debug!("delivery driver stopped");
}
