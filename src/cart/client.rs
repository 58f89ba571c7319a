//! Typed client for the cart actor.
//!
//! Hides the message passing behind ordinary async methods. Cheap to clone;
//! every clone talks to the same actor.

use super::actor::CartRequest;
use super::error::CartError;
use crate::model::{CartState, CartTotals, MenuItem, PricingConfig, Variant};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Client for interacting with the cart actor.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    /// Add one of `item` to the cart, no variant, no special instructions.
    pub async fn add(&self, item: MenuItem) -> Result<(), CartError> {
        self.add_item(item, 1, None, String::new()).await
    }

    /// Add `quantity` of `item` to the cart.
    ///
    /// Merging, the single-restaurant conflict and all notifications happen in
    /// the actor; by the time this returns the mutation (or the decided no-op)
    /// is complete and persisted.
    #[instrument(skip(self, item, variant, special_instructions), fields(item_id = %item.id))]
    pub async fn add_item(
        &self,
        item: MenuItem,
        quantity: u32,
        variant: Option<Variant>,
        special_instructions: String,
    ) -> Result<(), CartError> {
        debug!("Sending AddItem to cart actor");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::AddItem {
                item,
                quantity,
                variant,
                special_instructions,
                respond_to,
            })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)
    }

    /// Set a line's quantity. Zero or negative removes the line.
    #[instrument(skip(self))]
    pub async fn update_quantity(&self, line_id: &str, quantity: i64) -> Result<(), CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::UpdateQuantity {
                line_id: line_id.to_string(),
                quantity,
                respond_to,
            })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, line_id: &str) -> Result<(), CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::RemoveItem {
                line_id: line_id.to_string(),
                respond_to,
            })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)
    }

    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::Clear { respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)
    }

    /// A clone of the current cart state.
    pub async fn view(&self) -> Result<CartState, CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CartRequest::View { respond_to })
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)
    }

    /// Current derived amounts under the given pricing.
    pub async fn totals(&self, pricing: &PricingConfig) -> Result<CartTotals, CartError> {
        Ok(self.view().await?.totals(pricing))
    }
}
