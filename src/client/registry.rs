//! Topic → subscriber token mapping.
//!
//! One token per topic; subscribing again overwrites the old token.
//! Entries are never removed. Access is synchronized internally so the
//! registry can be shared by concurrent callers of one client.

use std::collections::HashMap;
use std::sync::Mutex;

pub type SubscriberId = String;

#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: Mutex<HashMap<String, SubscriberId>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `id` for `topic`, replacing any previous token.
    pub fn put(&self, topic: &str, id: SubscriberId) {
        self.lock().insert(topic.to_string(), id);
    }

    /// Token for `topic`, or the empty token if it was never subscribed.
    pub fn get(&self, topic: &str) -> SubscriberId {
        self.lock().get(topic).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The map is always left consistent, so a poisoned lock is still usable.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SubscriberId>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
