//! The bidirectional event connection, as a trait.
//!
//! The channel actor never touches sockets. It asks a [`Transport`] to open a
//! connection for an identity, hands it the sender half of a per-connection
//! inbound queue, and talks back through the returned [`Connection`].
//! Reconnection, if any, is the transport's business; this layer only reacts to
//! the `connect` / `disconnect` frames it is delivered.

pub mod mock;

use crate::protocol::{Handshake, InboundFrame, OutboundFrame};
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// Transport-level failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("connection closed")]
    Closed,
}

/// Opens connections keyed by identity.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a connection, attaching the handshake metadata once.
    ///
    /// Inbound frames for this connection are delivered through `inbound`; the
    /// caller keeps the receiving half and drops it to discard stragglers after
    /// teardown.
    async fn open(
        &self,
        handshake: Handshake,
        inbound: mpsc::Sender<InboundFrame>,
    ) -> Result<Box<dyn Connection>, TransportError>;
}

/// One live connection.
pub trait Connection: Send {
    /// Enqueue an outbound frame. Must not block; a closed connection returns
    /// [`TransportError::Closed`].
    fn send(&self, frame: OutboundFrame) -> Result<(), TransportError>;

    /// Close the connection. Idempotent.
    fn close(&mut self);
}
