//! Error types for the cart actor.
//!
//! Domain-level failures (cross-restaurant conflict declined, unknown line id,
//! storage trouble) never surface here — they degrade to no-ops inside the
//! actor, per the cart's no-throw contract. The only errors a caller can see
//! are actor-communication failures.

use thiserror::Error;

/// Errors that can occur talking to the cart actor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// The actor's channel is closed; the session is shutting down.
    #[error("cart actor closed")]
    ActorClosed,

    /// The actor dropped the response channel without answering.
    #[error("cart actor dropped response channel")]
    ActorDropped,
}
