//! Error types for the realtime channel actor.
//!
//! Transport trouble is reported through the notification sink, never raised to
//! callers; outbound sends while disconnected are silently dropped. As with the
//! cart, the only caller-visible errors are actor-communication failures.

use thiserror::Error;

/// Errors that can occur talking to the channel actor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChannelError {
    /// The actor's channel is closed; the session is shutting down.
    #[error("realtime channel actor closed")]
    ActorClosed,

    /// The actor dropped the response channel without answering.
    #[error("realtime channel actor dropped response channel")]
    ActorDropped,
}
