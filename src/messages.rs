//! One-shot messages stored in the session and shown by the next page.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::trace;
use utoipa::ToSchema;

const MESSAGES_KEY: &str = "messages";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlashMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Queues a message for the next page view.
pub async fn push(
    session: &Session,
    level: MessageLevel,
    text: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<FlashMessage> = session.get(MESSAGES_KEY).await?.unwrap_or_default();
    messages.push(FlashMessage::new(level, text));
    trace!("Queued flash message, {} pending", messages.len());
    session.insert(MESSAGES_KEY, messages).await
}

/// Removes and returns every pending message.
pub async fn take(session: &Session) -> Result<Vec<FlashMessage>, tower_sessions::session::Error> {
    Ok(session
        .remove::<Vec<FlashMessage>>(MESSAGES_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_messages_are_drained_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        push(&session, MessageLevel::Success, "Product added successfully!").await.unwrap();
        push(&session, MessageLevel::Error, "Product not found.").await.unwrap();

        let messages = take(&session).await.unwrap();
        assert_eq!(
            messages,
            vec![
                FlashMessage::new(MessageLevel::Success, "Product added successfully!"),
                FlashMessage::new(MessageLevel::Error, "Product not found."),
            ]
        );
        assert!(take(&session).await.unwrap().is_empty());
    }
}
