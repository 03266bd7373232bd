/// Event publisher abstraction and the simple publishers
///
/// - [`LogPublisher`]: writes each message to the trace log; used when no
///   message broker is configured
/// - [`MemoryPublisher`]: records messages in memory; used by tests

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

/// Error type for publishing
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Event could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Broker rejected the message or was unreachable
    #[error("Failed to publish to {topic} after {attempts} attempts: {last_error}")]
    Delivery {
        topic: String,
        attempts: u32,
        last_error: String,
    },
}

/// Sink for serialized domain events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one JSON payload on a topic
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError>;
}

/// Publisher that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogPublisher;

#[async_trait]
impl EventPublisher for LogPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        tracing::info!(topic = %topic, payload = %payload, "Domain event");
        Ok(())
    }
}

/// A message captured by [`MemoryPublisher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub topic: String,
    pub payload: String,
}

/// Publisher that keeps every message in memory
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    messages: Mutex<Vec<PublishedMessage>>,
    fail: bool,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A publisher that rejects every message
    pub fn failing() -> Self {
        Self {
            messages: Mutex::default(),
            fail: true,
        }
    }

    /// Messages published so far, oldest first
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.lock().clone()
    }

    /// Messages published on one topic
    pub fn messages_on(&self, topic: &str) -> Vec<PublishedMessage> {
        self.lock().iter().filter(|m| m.topic == topic).cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<PublishedMessage>> {
        self.messages.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<(), PublishError> {
        if self.fail {
            return Err(PublishError::Delivery {
                topic: topic.to_string(),
                attempts: 1,
                last_error: "publisher configured to fail".to_string(),
            });
        }

        self.lock().push(PublishedMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
        Ok(())
    }
}
