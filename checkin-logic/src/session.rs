use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::RwLock;

use crate::{
    cluster::{MessageCluster, cluster},
    error::ErrorKind,
    location::{LocationResolver, LocationService, ResolvedLocation},
    message::{MessageRepository, MessageService},
    settings::SessionSettings,
    submission::{StateUpdateSender, SubmissionController, SubmissionState},
    view::CheckInView,
};

#[derive(Default)]
struct Loaded {
    clusters: Vec<MessageCluster>,
    fetch_error: Option<ErrorKind>,
    location_error: Option<ErrorKind>,
}

/// One visit to the map: locates the user, loads everyone's messages, and lets the user leave
/// one of their own.
pub struct Session<P, F, M, S>
where
    P: LocationService,
    F: LocationService,
    M: MessageService + 'static,
    S: StateUpdateSender + 'static,
{
    resolver: LocationResolver<P, F>,
    service: Arc<M>,
    updates: Arc<S>,
    submission: Arc<SubmissionController<M, Arc<S>>>,
    loaded: RwLock<Loaded>,
    started: AtomicBool,
}

impl<P, F, M, S> Session<P, F, M, S>
where
    P: LocationService,
    F: LocationService,
    M: MessageService + 'static,
    S: StateUpdateSender + 'static,
{
    pub fn new(
        sensor: P,
        fallback: F,
        service: Arc<M>,
        updates: S,
        settings: SessionSettings,
    ) -> Self {
        let updates = Arc::new(updates);
        Self {
            resolver: LocationResolver::new(sensor, fallback),
            submission: Arc::new(SubmissionController::new(
                service.clone(),
                updates.clone(),
                settings,
            )),
            service,
            updates,
            loaded: RwLock::default(),
            started: AtomicBool::new(false),
        }
    }

    /// Locate the user and load messages side by side. Only the first call does anything.
    ///
    /// Completes when both are done, which may be never if the sensor never answers. Either half
    /// sends a state update as soon as it lands.
    pub async fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        tokio::join!(self.load_messages(), self.locate());
    }

    async fn load_messages(&self) {
        let res = MessageRepository::new(self.service.clone()).fetch_all().await;
        let mut loaded = self.loaded.write().await;
        match res {
            Ok(messages) => loaded.clusters = cluster(messages),
            Err(why) => loaded.fetch_error = Some(why),
        }
        drop(loaded);
        self.updates.send_update();
    }

    async fn locate(&self) {
        if let Err(why) = self.resolver.resolve().await {
            self.loaded.write().await.location_error = Some(why);
        }
        self.updates.send_update();
    }

    pub async fn location(&self) -> Option<ResolvedLocation> {
        self.resolver.current().await
    }

    pub async fn clusters(&self) -> Vec<MessageCluster> {
        self.loaded.read().await.clusters.clone()
    }

    pub async fn fetch_error(&self) -> Option<ErrorKind> {
        self.loaded.read().await.fetch_error.clone()
    }

    pub async fn location_error(&self) -> Option<ErrorKind> {
        self.loaded.read().await.location_error.clone()
    }

    pub fn submission(&self) -> &SubmissionController<M, Arc<S>> {
        &self.submission
    }

    pub async fn submission_state(&self) -> SubmissionState {
        self.submission.state().await
    }

    pub async fn set_name(&self, name: impl Into<String>) -> bool {
        self.submission.set_name(name).await
    }

    pub async fn set_message(&self, message: impl Into<String>) -> bool {
        self.submission.set_message(message).await
    }

    /// Submit the draft from wherever the user was located, see [SubmissionController::submit]
    pub async fn submit(&self) -> bool {
        let location = self.location().await;
        self.submission.submit(location).await
    }

    pub fn shutdown(&self) {
        self.submission.shutdown();
    }

    pub async fn view(&self) -> CheckInView {
        let location = self.location().await;
        let submission = self.submission.snapshot().await;
        let loaded = self.loaded.read().await;
        let notices = [&loaded.location_error, &loaded.fetch_error]
            .into_iter()
            .flatten()
            .map(ToString::to_string)
            .collect();
        CheckInView::build(location.as_ref(), &loaded.clusters, &submission, notices)
    }
}
