//! In-memory bindings of the collaborator ports.
//!
//! Exported from the library (not hidden behind `#[cfg(test)]`) so integration
//! tests and the demo binary can use them, the same way the actor framework
//! ships its `MockClient` as a public module.

use super::{
    ConflictPrompt, DecisionProvider, NotificationSink, PersistenceError, PersistencePort, Severity,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{error, info};

/// A `PersistencePort` over a `HashMap`, with a switch to make every call fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a value, e.g. a persisted cart snapshot from a previous session.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.into(), value.into());
    }

    /// Make every subsequent get/set fail, to exercise degraded-storage paths.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Direct read of the stored value, for assertions.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl PersistencePort for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::ReadFailed("memory store offline".into()));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailed("memory store offline".into()));
        }
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

/// A `DecisionProvider` that always gives the same answer and remembers every
/// prompt it was asked.
#[derive(Debug)]
pub struct CannedDecision {
    answer: bool,
    prompts: Mutex<Vec<ConflictPrompt>>,
}

impl CannedDecision {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<ConflictPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DecisionProvider for CannedDecision {
    async fn ask(&self, prompt: &ConflictPrompt) -> bool {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answer
    }
}

/// A `NotificationSink` that records everything it is told.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notifications: Mutex<Vec<(String, Severity)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<(String, Severity)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|(m, _)| m.clone())
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, severity: Severity) {
        self.notifications
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

/// A `NotificationSink` that forwards to `tracing`, for headless runs.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success | Severity::Info => info!(%severity, "{message}"),
            Severity::Error => error!(%severity, "{message}"),
        }
    }
}
