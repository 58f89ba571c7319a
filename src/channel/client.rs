//! Typed client for the realtime channel actor.

use super::actor::ChannelCommand;
use super::error::ChannelError;
use crate::model::{ConnectionState, RealtimeEvent};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

/// Client for interacting with the channel actor. Cheap to clone.
#[derive(Clone)]
pub struct ChannelClient {
    sender: mpsc::Sender<ChannelCommand>,
}

impl ChannelClient {
    pub fn new(sender: mpsc::Sender<ChannelCommand>) -> Self {
        Self { sender }
    }

    /// Push an order status update. Dropped silently unless Connected.
    #[instrument(skip(self, data))]
    pub async fn send_order_update(
        &self,
        order_id: &str,
        status: &str,
        data: Value,
    ) -> Result<(), ChannelError> {
        self.sender
            .send(ChannelCommand::SendOrderUpdate {
                order_id: order_id.to_string(),
                status: status.to_string(),
                data,
            })
            .await
            .map_err(|_| ChannelError::ActorClosed)
    }

    /// Push the courier's position. Dropped silently unless Connected.
    #[instrument(skip(self))]
    pub async fn send_delivery_location(
        &self,
        order_id: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), ChannelError> {
        self.sender
            .send(ChannelCommand::SendDeliveryLocation {
                order_id: order_id.to_string(),
                latitude,
                longitude,
            })
            .await
            .map_err(|_| ChannelError::ActorClosed)
    }

    /// Fire-and-forget subscription intent; acknowledgements are not tracked.
    #[instrument(skip(self))]
    pub async fn subscribe_to_order_updates(&self, order_id: &str) -> Result<(), ChannelError> {
        self.sender
            .send(ChannelCommand::SubscribeOrder {
                order_id: order_id.to_string(),
            })
            .await
            .map_err(|_| ChannelError::ActorClosed)
    }

    /// Fire-and-forget subscription intent; acknowledgements are not tracked.
    #[instrument(skip(self))]
    pub async fn subscribe_to_delivery_updates(&self, order_id: &str) -> Result<(), ChannelError> {
        self.sender
            .send(ChannelCommand::SubscribeDelivery {
                order_id: order_id.to_string(),
            })
            .await
            .map_err(|_| ChannelError::ActorClosed)
    }

    /// Recent order events, newest first, at most ten.
    pub async fn order_updates(&self) -> Result<Vec<RealtimeEvent>, ChannelError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ChannelCommand::OrderHistory { respond_to })
            .await
            .map_err(|_| ChannelError::ActorClosed)?;
        response.await.map_err(|_| ChannelError::ActorDropped)
    }

    /// Recent delivery events, newest first, at most ten.
    pub async fn delivery_updates(&self) -> Result<Vec<RealtimeEvent>, ChannelError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ChannelCommand::DeliveryHistory { respond_to })
            .await
            .map_err(|_| ChannelError::ActorClosed)?;
        response.await.map_err(|_| ChannelError::ActorDropped)
    }

    pub async fn connection_state(&self) -> Result<ConnectionState, ChannelError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ChannelCommand::State { respond_to })
            .await
            .map_err(|_| ChannelError::ActorClosed)?;
        response.await.map_err(|_| ChannelError::ActorDropped)
    }
}
