use std::collections::HashMap;

/// Namespace prepended to every label before it reaches the store.
pub const KEY_PREFIX: &str = "faqWidget:";

pub fn cache_key(label: &str) -> String {
    format!("{KEY_PREFIX}{label}")
}

/// Durable key-value store the widget caches answers in.
///
/// Entries never expire and the store is unbounded.
pub trait AnswerStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AnswerStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
