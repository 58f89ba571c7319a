//! Collaborator ports consumed by the core.
//!
//! Everything the cart and channel actors need from the outside world comes in
//! through these traits, injected at spawn time the same way actor dependencies
//! are wired in [`crate::lifecycle`]. Production code binds them to real
//! storage/prompts/toasts; tests bind the in-memory fakes from [`memory`].

pub mod memory;

use async_trait::async_trait;
use std::fmt::Display;
use thiserror::Error;

/// Failure talking to durable storage. Never fatal: the in-memory state stays
/// authoritative for the session and the write is simply lost.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PersistenceError {
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    #[error("storage write failed: {0}")]
    WriteFailed(String),
}

/// Durable key-value blob storage (local storage, a file, a table — the cart
/// does not care).
#[async_trait]
pub trait PersistencePort: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    async fn set(&self, key: &str, value: String) -> Result<(), PersistenceError>;
}

/// The cross-restaurant conflict put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictPrompt {
    /// Restaurant the cart currently belongs to.
    pub current_restaurant_id: String,
    /// Restaurant of the item being added.
    pub incoming_restaurant_id: String,
    /// Name of the item being added, for the prompt text.
    pub item_name: String,
}

/// Resolves a conflict prompt to a yes/no answer.
///
/// May answer immediately or only after user interaction; the cart actor awaits
/// the answer either way and assumes nothing about timing.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    async fn ask(&self, prompt: &ConflictPrompt) -> bool;
}

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Accepts user-visible feedback (a toast, a banner, a log line).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}
