//! Topic broker
//!
//! Maps each topic to the subscribers currently receiving it. Every
//! subscription owns a single-slot delivery channel; the broker keeps the
//! sending half and hands the receiving half to whoever drains it.
//!
//! Concurrency notes:
//! - Mutations (`subscribe`, `unsubscribe`, `unsubscribe_all`) take the write
//!   lock, so check-then-insert is atomic.
//! - `publish` holds the read lock for the whole fan-out. A full slot makes the
//!   publisher wait, and a subscription cannot be closed underneath it, so a
//!   channel is never written after it was closed.
//! - Topics are created lazily and never removed, even once empty.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::broker::topic::{Delivery, Topic};
use crate::utils::error::BrokerError;

#[derive(Debug, Default)]
pub struct PubSub {
    topics: RwLock<HashMap<String, Topic>>,
}

impl PubSub {
    pub fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes `id` to `topic`, creating the topic if it doesn't exist.
    pub async fn subscribe(&self, id: &str, topic: &str) -> Result<Delivery, BrokerError> {
        debug!(id, topic, "Subscribe");

        let mut topics = self.topics.write().await;
        let entry = topics.entry(topic.to_string()).or_insert_with(|| {
            debug!(topic, "Topic is uninitialized, creating it");
            Topic::new(topic)
        });
        entry.subscribe(id)
    }

    /// Closes the subscription of `id` to `topic`.
    pub async fn unsubscribe(&self, id: &str, topic: &str) -> Result<(), BrokerError> {
        debug!(id, topic, "Unsubscribe");

        let mut topics = self.topics.write().await;
        match topics.get_mut(topic) {
            Some(t) => t.unsubscribe(id),
            None => Err(BrokerError::NotSubscribed),
        }
    }

    /// Closes every subscription held by `id`. Returns how many were closed.
    pub async fn unsubscribe_all(&self, id: &str) -> usize {
        self.unsubscribe_all_with(id, || {}).await
    }

    /// Like `unsubscribe_all`, but runs `while_locked` once the write lock is
    /// held and before any subscription is closed. No subscribe can slip in
    /// between the two.
    pub async fn unsubscribe_all_with<F: FnOnce()>(&self, id: &str, while_locked: F) -> usize {
        debug!(id, "UnsubscribeAll");

        let mut topics = self.topics.write().await;
        while_locked();
        topics
            .values_mut()
            .filter_map(|t| t.unsubscribe(id).ok())
            .count()
    }

    /// Publishes `message` to every current subscriber of `topic`.
    /// Returns how many subscribers it was handed to.
    pub async fn publish(&self, topic: &str, message: &str) -> usize {
        debug!(topic, msg = message, "Publish");

        let topics = self.topics.read().await;
        match topics.get(topic) {
            Some(t) => t.publish(message).await,
            None => {
                debug!(topic, "Topic is uninitialized");
                0
            }
        }
    }

    pub async fn is_subscribed(&self, id: &str, topic: &str) -> bool {
        self.topics
            .read()
            .await
            .get(topic)
            .is_some_and(|t| t.is_subscribed(id))
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.read().await.get(topic).map_or(0, Topic::len)
    }

    pub async fn topic_count(&self) -> usize {
        self.topics.read().await.len()
    }
}
