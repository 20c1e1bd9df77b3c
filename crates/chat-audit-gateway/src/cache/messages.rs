//! Bounded message cache

use chat_audit_core::{MessageSnapshot, Snowflake};
use std::collections::{HashMap, VecDeque};

/// Most recent messages, oldest evicted first
#[derive(Debug)]
pub struct MessageCache {
    capacity: usize,
    order: VecDeque<Snowflake>,
    messages: HashMap<Snowflake, MessageSnapshot>,
}

impl MessageCache {
    /// A capacity of zero disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            messages: HashMap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Add a message, or replace it in place if already cached
    pub fn insert(&mut self, message: MessageSnapshot) {
        if self.capacity == 0 {
            return;
        }

        let id = message.id;
        if self.messages.insert(id, message).is_some() {
            return;
        }

        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.messages.remove(&oldest);
            }
        }
    }

    pub fn get(&self, id: Snowflake) -> Option<&MessageSnapshot> {
        self.messages.get(&id)
    }

    pub fn remove(&mut self, id: Snowflake) -> Option<MessageSnapshot> {
        let message = self.messages.remove(&id)?;
        self.order.retain(|cached| *cached != id);
        Some(message)
    }
}
