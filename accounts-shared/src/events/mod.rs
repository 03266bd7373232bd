/// Domain events
///
/// Every committed transition produces exactly one event. Events are not
/// persisted by the core: the calling layer hands them to an
/// [`EventPublisher`] after the write has committed. Publishing is
/// best-effort, a failure is logged and never undoes the transition.
///
/// # Topics
///
/// | Event | Topic |
/// |-------|-------|
/// | [`UserCreated`] | `new_user` |
/// | [`UserActivated`] | `activated_user` |
/// | [`UserDeactivated`] | `deactivated_user` |
///
/// Payloads are JSON objects with the event fields.
///
/// # Example
///
/// ```
/// use accounts_shared::events::{publish_event, MemoryPublisher, UserActivated};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let publisher = MemoryPublisher::new();
/// publish_event(&publisher, &UserActivated { id: Uuid::new_v4(), version: 3 }).await?;
///
/// assert_eq!(publisher.messages()[0].topic, "activated_user");
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod publisher;
pub mod redis_stream;

pub use publisher::{EventPublisher, LogPublisher, MemoryPublisher, PublishError, PublishedMessage};
pub use redis_stream::{RedisConfig, RedisStreamPublisher};

/// An event with a fixed topic
pub trait DomainEvent: Serialize + Send + Sync {
    const TOPIC: &'static str;

    /// User the event is about
    fn user_id(&self) -> Uuid;
}

/// A user row was inserted, active at version 1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreated {
    pub id: Uuid,
    pub email_address: String,
    pub version: i64,
}

/// An inactive user was activated; `version` is the new version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivated {
    pub id: Uuid,
    pub version: i64,
}

/// An active user was deactivated; `version` is the new version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDeactivated {
    pub id: Uuid,
    pub version: i64,
}

impl DomainEvent for UserCreated {
    const TOPIC: &'static str = "new_user";

    fn user_id(&self) -> Uuid {
        self.id
    }
}

impl DomainEvent for UserActivated {
    const TOPIC: &'static str = "activated_user";

    fn user_id(&self) -> Uuid {
        self.id
    }
}

impl DomainEvent for UserDeactivated {
    const TOPIC: &'static str = "deactivated_user";

    fn user_id(&self) -> Uuid {
        self.id
    }
}

/// Serializes an event and publishes it on its topic
pub async fn publish_event<E: DomainEvent>(
    publisher: &dyn EventPublisher,
    event: &E,
) -> Result<(), PublishError> {
    let payload = serde_json::to_string(event)?;
    publisher.publish(E::TOPIC, &payload).await?;

    tracing::debug!(topic = E::TOPIC, user_id = %event.user_id(), "Published domain event");
    Ok(())
}
