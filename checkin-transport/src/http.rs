use checkin_logic::{Message, MessageService, NewMessage, prelude::*};
use log::debug;

use crate::server::{Endpoints, REQUEST_TIMEOUT};

/// JSON-over-HTTP client for the message service
pub struct HttpMessageService {
    client: reqwest::Client,
    url: String,
}

impl HttpMessageService {
    pub fn new(endpoints: &Endpoints) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url: endpoints.messages_url(),
        })
    }
}

impl MessageService for HttpMessageService {
    async fn fetch_messages(&self) -> Result<Vec<Message>> {
        debug!("GET {}", self.url);
        self.client
            .get(&self.url)
            .send()
            .await
            .context("Could not send request")?
            .error_for_status()
            .context("Server returned error")?
            .json()
            .await
            .context("Server sent an invalid message list")
    }

    async fn post_message(&self, message: &NewMessage) -> Result<Message> {
        debug!("POST {}", self.url);
        self.client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .context("Could not send request")?
            .error_for_status()
            .context("Server returned error")?
            .json()
            .await
            .context("Server sent an invalid message")
    }
}
