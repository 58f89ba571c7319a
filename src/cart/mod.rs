//! The cart actor: owns [`crate::model::CartState`] and is the only place it
//! mutates.

pub mod actor;
pub mod client;
pub mod error;

pub use actor::{CartActor, CartContext, CartRequest, CART_STORAGE_KEY};
pub use client::CartClient;
pub use error::CartError;

use tokio::sync::mpsc;

/// Creates a cart actor and its client.
///
/// The actor still needs its collaborators injected via
/// [`CartActor::run`]; see [`crate::lifecycle::SessionSystem`] for the wiring.
pub fn new(buffer_size: usize) -> (CartActor, CartClient) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CartActor::new(receiver), CartClient::new(sender))
}
