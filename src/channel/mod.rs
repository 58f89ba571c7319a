//! The realtime channel actor: connection lifecycle, bounded event histories
//! and outbound status pushes.

pub mod actor;
pub mod client;
pub mod error;

pub use actor::{ChannelActor, ChannelCommand, ChannelContext};
pub use client::ChannelClient;
pub use error::ChannelError;

use tokio::sync::mpsc;

/// Creates a channel actor and its client.
///
/// The actor still needs its collaborators (auth gate, transport, notifier)
/// injected via [`ChannelActor::run`].
pub fn new(buffer_size: usize) -> (ChannelActor, ChannelClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ChannelActor::new(receiver), ChannelClient::new(sender))
}
