//! Event bus implementation.
//!
//! Handlers run synchronously on the publishing thread; the scene layer
//! is single-writer, so the only locked structure is the handler
//! registry itself.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::events::SceneEvent;
use crate::error::EventBusError;

/// Subscription handle for unsubscribing from events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Type alias for event handler functions.
type EventHandler = Box<dyn Fn(&SceneEvent) + Send + Sync>;

/// Event bus for scene state-change notifications.
///
/// Cloning shares the handler registry, so the model group and the
/// subscribing layers can each hold a handle.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<SubscriptionId, EventHandler>>>,
}

impl EventBus {
    /// Creates a new event bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of handlers invoked, or an error if nobody is
    /// listening.
    pub fn publish(&self, event: &SceneEvent) -> Result<usize, EventBusError> {
        let handlers = self.handlers.read();
        if handlers.is_empty() {
            return Err(EventBusError::NoSubscribers);
        }
        for handler in handlers.values() {
            handler(event);
        }
        Ok(handlers.len())
    }

    /// Subscribe to events with a synchronous handler.
    ///
    /// The handler is called on the publishing thread and should return
    /// quickly to avoid blocking event dispatch.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&SceneEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, Box::new(handler));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Unsubscribe from events.
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
