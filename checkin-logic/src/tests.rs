use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use anyhow::{anyhow, bail};
use tokio::sync::Mutex;

use crate::{
    Coordinate, LocationService, Message, MessageId, MessageService, NewMessage,
    StateUpdateSender, prelude::*,
};

pub fn msg(id: &str, latitude: f64, longitude: f64) -> Message {
    Message {
        id: MessageId::from(id),
        name: format!("Visitor {id}"),
        message: format!("Hello from {id}"),
        coordinate: Coordinate::new(latitude, longitude),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PostBehavior {
    /// Store and echo back the message
    Echo,
    /// Answer with an error
    Fail,
    /// Never answer
    Hang,
}

pub struct MockMessageService {
    messages: Option<Vec<Message>>,
    hang_fetch: bool,
    behavior: PostBehavior,
    posted: Mutex<Vec<NewMessage>>,
}

impl MockMessageService {
    pub fn with_messages(messages: Vec<Message>) -> Self {
        Self {
            messages: Some(messages),
            hang_fetch: false,
            behavior: PostBehavior::Echo,
            posted: Mutex::default(),
        }
    }

    pub fn posting(behavior: PostBehavior) -> Self {
        Self {
            messages: Some(Vec::new()),
            hang_fetch: false,
            behavior,
            posted: Mutex::default(),
        }
    }

    /// Every request fails
    pub fn failing() -> Self {
        Self {
            messages: None,
            hang_fetch: false,
            behavior: PostBehavior::Fail,
            posted: Mutex::default(),
        }
    }

    /// Fetches never answer, writes are echoed
    pub fn unanswered_fetch() -> Self {
        Self {
            messages: None,
            hang_fetch: true,
            behavior: PostBehavior::Echo,
            posted: Mutex::default(),
        }
    }

    pub async fn posted(&self) -> Vec<NewMessage> {
        self.posted.lock().await.clone()
    }
}

impl MessageService for MockMessageService {
    async fn fetch_messages(&self) -> Result<Vec<Message>> {
        if self.hang_fetch {
            std::future::pending::<()>().await;
        }
        self.messages
            .clone()
            .ok_or_else(|| anyhow!("Connection refused"))
    }

    async fn post_message(&self, message: &NewMessage) -> Result<Message> {
        let mut posted = self.posted.lock().await;
        posted.push(message.clone());
        let id = posted.len().to_string();
        drop(posted);

        match self.behavior {
            PostBehavior::Echo => Ok(Message {
                id: MessageId(id),
                name: message.name.clone(),
                message: message.message.clone(),
                coordinate: message.coordinate,
            }),
            PostBehavior::Fail => bail!("500 Internal Server Error"),
            PostBehavior::Hang => std::future::pending().await,
        }
    }
}

/// A location source that always answers the same way, cloning shares the call counter
#[derive(Clone)]
pub struct MockLocation {
    coordinate: Option<Coordinate>,
    hang: bool,
    calls: Arc<AtomicUsize>,
}

impl MockLocation {
    pub fn at(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            hang: false,
            calls: Arc::default(),
        }
    }

    pub fn denied() -> Self {
        Self {
            coordinate: None,
            hang: false,
            calls: Arc::default(),
        }
    }

    /// Never answers, like an unanswered permission prompt
    pub fn unanswered() -> Self {
        Self {
            coordinate: None,
            hang: true,
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocationService for MockLocation {
    async fn get_loc(&self) -> Result<Coordinate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.coordinate
            .ok_or_else(|| anyhow!("User denied the location permission"))
    }
}

#[derive(Default)]
pub struct CountingSender(AtomicUsize);

impl CountingSender {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl StateUpdateSender for CountingSender {
    fn send_update(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
