use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::utils::error::BrokerError;

pub type SubscriberId = String;

/// Receiving end of a subscription. Yields `None` once the subscription is
/// closed by the broker.
pub type Delivery = mpsc::Receiver<String>;

/// Each subscription buffers at most one undelivered message; a publisher
/// waits for the slot to free up.
pub const DELIVERY_CAPACITY: usize = 1;

/// Represents a topic in the broker system
/// Maps every current subscriber to the sending half of its delivery channel.
/// Dropping a sender is what closes a subscription.
#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    subscribers: HashMap<SubscriberId, mpsc::Sender<String>>,
}

impl Topic {
    /// Creates a new instance of the Topic with the given name
    /// Initializes an empty set of subscribers
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashMap::new(),
        }
    }

    /// Opens a delivery channel for `id`. Fails if `id` already has one.
    pub fn subscribe(&mut self, id: &str) -> Result<Delivery, BrokerError> {
        if self.subscribers.contains_key(id) {
            return Err(BrokerError::AlreadySubscribed);
        }
        let (tx, rx) = mpsc::channel(DELIVERY_CAPACITY);
        self.subscribers.insert(id.to_string(), tx);
        Ok(rx)
    }

    /// Closes the delivery channel of `id` and forgets it.
    pub fn unsubscribe(&mut self, id: &str) -> Result<(), BrokerError> {
        self.subscribers
            .remove(id)
            .map(drop)
            .ok_or(BrokerError::NotSubscribed)
    }

    pub fn is_subscribed(&self, id: &str) -> bool {
        self.subscribers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Hands `message` to every subscriber, waiting on any whose slot is full.
    /// Returns how many subscribers accepted it.
    pub async fn publish(&self, message: &str) -> usize {
        let mut delivered = 0;
        for (id, tx) in &self.subscribers {
            debug!(topic = %self.name, id = %id, "Publishing to client");
            match tx.send(message.to_string()).await {
                Ok(()) => delivered += 1,
                Err(_) => warn!(topic = %self.name, id = %id, "Delivery task is gone"),
            }
        }
        delivered
    }
}
