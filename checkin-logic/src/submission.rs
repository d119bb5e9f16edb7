use std::sync::Arc;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    draft::{DraftField, MessageDraft, validate},
    error::ErrorKind,
    location::ResolvedLocation,
    message::{Message, MessageService, NewMessage},
    settings::SessionSettings,
};

/// Notifies the front end that something it renders has changed
pub trait StateUpdateSender: Send + Sync {
    fn send_update(&self);
}

impl<S: StateUpdateSender + ?Sized> StateUpdateSender for Arc<S> {
    fn send_update(&self) {
        (**self).send_update();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    /// The user is typing, the only state that accepts edits and submits
    Composing,
    /// A write is in flight or was acknowledged and the thank-you is pending
    Sending,
    /// The message was stored, nothing leaves this state
    Sent,
}

/// Everything the renderer needs from the controller, taken under one lock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSnapshot {
    pub state: SubmissionState,
    pub draft: MessageDraft,
    pub draft_valid: bool,
    pub error: Option<ErrorKind>,
}

struct Submission {
    state: SubmissionState,
    draft: MessageDraft,
    last_error: Option<ErrorKind>,
    posted: Option<Message>,
}

/// Owns the draft and drives it through [SubmissionState], writing to a [MessageService] when
/// submitted.
pub struct SubmissionController<M: MessageService, S: StateUpdateSender> {
    inner: Mutex<Submission>,
    service: Arc<M>,
    updates: S,
    settings: SessionSettings,
    cancel: CancellationToken,
}

impl<M, S> SubmissionController<M, S>
where
    M: MessageService + 'static,
    S: StateUpdateSender + 'static,
{
    pub fn new(service: Arc<M>, updates: S, settings: SessionSettings) -> Self {
        Self {
            inner: Mutex::new(Submission {
                state: SubmissionState::Composing,
                draft: MessageDraft::default(),
                last_error: None,
                posted: None,
            }),
            service,
            updates,
            settings,
            cancel: CancellationToken::new(),
        }
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.state
    }

    pub async fn draft(&self) -> MessageDraft {
        self.inner.lock().await.draft.clone()
    }

    /// Why the last submit went back to [SubmissionState::Composing], cleared by the next edit
    pub async fn last_error(&self) -> Option<ErrorKind> {
        self.inner.lock().await.last_error.clone()
    }

    /// The message as stored by the service, once [SubmissionState::Sent]
    pub async fn posted(&self) -> Option<Message> {
        self.inner.lock().await.posted.clone()
    }

    pub async fn snapshot(&self) -> SubmissionSnapshot {
        let inner = self.inner.lock().await;
        SubmissionSnapshot {
            state: inner.state,
            draft: inner.draft.clone(),
            draft_valid: inner.draft.is_valid(),
            error: inner.last_error.clone(),
        }
    }

    /// Replace a draft field. Returns false, leaving the draft alone, unless composing.
    pub async fn edit(&self, field: DraftField, value: impl Into<String>) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.state != SubmissionState::Composing {
            debug!("Ignoring edit to {field} while {:?}", inner.state);
            return false;
        }
        inner.draft.set(field, value.into());
        inner.last_error = None;
        drop(inner);
        self.updates.send_update();
        true
    }

    pub async fn set_name(&self, name: impl Into<String>) -> bool {
        self.edit(DraftField::Name, name).await
    }

    pub async fn set_message(&self, message: impl Into<String>) -> bool {
        self.edit(DraftField::Message, message).await
    }

    /// Whether [Self::submit] would do anything, used to enable the submit control
    pub async fn can_submit(&self, location: Option<&ResolvedLocation>) -> bool {
        let inner = self.inner.lock().await;
        !self.cancel.is_cancelled()
            && location.is_some()
            && inner.state == SubmissionState::Composing
            && inner.draft.is_valid()
    }

    /// Start sending the draft from `location`. Returns whether a write was started, when it
    /// wasn't nothing changed.
    ///
    /// The state is [SubmissionState::Sending] by the time this returns, the write and the
    /// deferred move to [SubmissionState::Sent] happen on a spawned task.
    pub async fn submit(self: &Arc<Self>, location: Option<ResolvedLocation>) -> bool {
        let mut inner = self.inner.lock().await;

        if self.cancel.is_cancelled() {
            debug!("Not submitting, controller was shut down");
            return false;
        }

        let Some(location) = location else {
            debug!("Not submitting, location is unresolved");
            return false;
        };

        if inner.state != SubmissionState::Composing {
            debug!("Not submitting, already {:?}", inner.state);
            return false;
        }

        if let Err(why) = validate(&inner.draft) {
            debug!("Not submitting: {why}");
            return false;
        }

        let outgoing = NewMessage {
            name: inner.draft.name.clone(),
            message: inner.draft.message.clone(),
            coordinate: location.coordinate,
        };
        inner.state = SubmissionState::Sending;
        inner.last_error = None;
        drop(inner);

        self.updates.send_update();

        tokio::spawn({
            let controller = self.clone();
            async move {
                controller.deliver(outgoing).await;
            }
        });

        true
    }

    /// Drop any in-flight write or pending thank-you, the state stays as it is. This is final,
    /// later submits are refused.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    async fn deliver(self: Arc<Self>, outgoing: NewMessage) {
        let response = tokio::select! {
            biased;

            _ = self.cancel.cancelled() => {
                debug!("Submission cancelled while waiting on the service");
                return;
            }

            res = tokio::time::timeout(
                self.settings.response_timeout(),
                self.service.post_message(&outgoing),
            ) => res,
        };

        let stored = match response {
            Ok(Ok(stored)) => stored,
            Ok(Err(why)) => {
                self.fail(ErrorKind::service(&why)).await;
                return;
            }
            Err(_) => {
                let msg = "No response from the message service".to_string();
                self.fail(ErrorKind::ServiceUnavailable(msg)).await;
                return;
            }
        };

        info!(
            "Message {} stored, thanking in {:?}",
            stored.id,
            self.settings.finish_delay()
        );

        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => {
                debug!("Submission cancelled before finishing");
            }

            _ = tokio::time::sleep(self.settings.finish_delay()) => {
                self.finish(stored).await;
            }
        }
    }

    async fn finish(&self, stored: Message) {
        let mut inner = self.inner.lock().await;
        inner.state = SubmissionState::Sent;
        inner.draft = MessageDraft::default();
        inner.posted = Some(stored);
        drop(inner);
        self.updates.send_update();
    }

    async fn fail(&self, why: ErrorKind) {
        error!("Failed to send message: {why}");
        let mut inner = self.inner.lock().await;
        inner.state = SubmissionState::Composing;
        inner.last_error = Some(why);
        drop(inner);
        self.updates.send_update();
    }
}
