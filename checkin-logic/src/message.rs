use std::{fmt, sync::Arc};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{error::ErrorKind, location::Coordinate, prelude::*};

/// Opaque identifier assigned by the message service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A message left by a visitor, as returned by the message service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: MessageId,
    pub name: String,
    pub message: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// Body of a write to the message service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub name: String,
    pub message: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

/// The remote store of messages
pub trait MessageService: Send + Sync {
    /// Get every message the service has
    fn fetch_messages(&self) -> impl Future<Output = Result<Vec<Message>>> + Send;
    /// Store a new message, resolves to the stored message as echoed back by the service
    fn post_message(&self, message: &NewMessage) -> impl Future<Output = Result<Message>> + Send;
}

/// One-shot reader for the message list, consumed by [Self::fetch_all]
pub struct MessageRepository<M: MessageService> {
    service: Arc<M>,
}

impl<M: MessageService> MessageRepository<M> {
    pub fn new(service: Arc<M>) -> Self {
        Self { service }
    }

    pub async fn fetch_all(self) -> Result<impl Iterator<Item = Message>, ErrorKind> {
        match self.service.fetch_messages().await {
            Ok(messages) => {
                info!("Fetched {} messages", messages.len());
                Ok(messages.into_iter())
            }
            Err(why) => {
                warn!("Failed to fetch messages: {why:#}");
                Err(ErrorKind::service(&why))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{MockMessageService, msg};
    use tokio::test;

    #[test]
    async fn test_fetch_keeps_service_order() {
        let service = Arc::new(MockMessageService::with_messages(vec![
            msg("1", 1.0, 1.0),
            msg("2", 2.0, 2.0),
            msg("3", 3.0, 3.0),
        ]));

        let ids = MessageRepository::new(service)
            .fetch_all()
            .await
            .expect("Fetch failed")
            .map(|m| m.id.0)
            .collect::<Vec<_>>();

        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    async fn test_fetch_failure_is_service_unavailable() {
        let service = Arc::new(MockMessageService::failing());

        let res = MessageRepository::new(service).fetch_all().await;

        assert!(matches!(res, Err(ErrorKind::ServiceUnavailable(_))));
    }

    #[test]
    async fn test_wire_format() {
        let raw = r#"{"_id":"abc","name":"A","message":"hi","latitude":1.5,"longitude":-2.25,"date":"ignored"}"#;
        let parsed: Message = serde_json::from_str(raw).expect("Failed to parse");
        assert_eq!(parsed.id, MessageId::from("abc"));
        assert_eq!(parsed.coordinate, Coordinate::new(1.5, -2.25));

        let body = NewMessage {
            name: "A".to_string(),
            message: "hi".to_string(),
            coordinate: Coordinate::new(1.5, -2.25),
        };
        let value = serde_json::to_value(&body).expect("Failed to encode");
        assert_eq!(
            value,
            serde_json::json!({"name": "A", "message": "hi", "latitude": 1.5, "longitude": -2.25})
        );
    }
}
