//! Wire frames exchanged over the realtime connection.
//!
//! Frame and field names match the backend contract: inbound events arrive as
//! `connect` / `disconnect` / `order_update` / `delivery_update` / `error`,
//! outbound emits use dotted names (`order.update`, `delivery.location`,
//! `subscribe.order`, `subscribe.delivery`) with camelCase payload fields and
//! ISO-8601 timestamps.

use crate::model::{Identity, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type tag carried inside update payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadKind {
    OrderUpdate,
    DeliveryUpdate,
}

/// Body of an `order_update` / `delivery_update` frame.
///
/// The backend sends a type tag and a human-readable message plus arbitrary
/// domain fields; the extras are kept opaque and carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePayload {
    #[serde(rename = "type")]
    pub kind: PayloadKind,
    pub message: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UpdatePayload {
    pub fn new(kind: PayloadKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Body of an inbound `error` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: String,
}

/// Named frames delivered by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum InboundFrame {
    Connect,
    Disconnect,
    OrderUpdate(UpdatePayload),
    DeliveryUpdate(UpdatePayload),
    Error(ErrorPayload),
}

/// Named frames emitted to the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload")]
pub enum OutboundFrame {
    #[serde(rename = "order.update", rename_all = "camelCase")]
    OrderUpdate {
        #[serde(rename = "type")]
        kind: PayloadKind,
        order_id: String,
        status: String,
        data: Value,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "delivery.location", rename_all = "camelCase")]
    DeliveryLocation {
        #[serde(rename = "type")]
        kind: PayloadKind,
        order_id: String,
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
    },
    #[serde(rename = "subscribe.order")]
    SubscribeOrder(String),
    #[serde(rename = "subscribe.delivery")]
    SubscribeDelivery(String),
}

impl OutboundFrame {
    pub fn order_update(order_id: impl Into<String>, status: impl Into<String>, data: Value) -> Self {
        Self::OrderUpdate {
            kind: PayloadKind::OrderUpdate,
            order_id: order_id.into(),
            status: status.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn delivery_location(order_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self::DeliveryLocation {
            kind: PayloadKind::DeliveryUpdate,
            order_id: order_id.into(),
            latitude,
            longitude,
            timestamp: Utc::now(),
        }
    }

    /// The wire name of this frame.
    pub fn name(&self) -> &'static str {
        match self {
            OutboundFrame::OrderUpdate { .. } => "order.update",
            OutboundFrame::DeliveryLocation { .. } => "delivery.location",
            OutboundFrame::SubscribeOrder(_) => "subscribe.order",
            OutboundFrame::SubscribeDelivery(_) => "subscribe.delivery",
        }
    }
}

/// Connection metadata attached once when the transport connects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub user_id: String,
    pub role: Role,
}

impl From<&Identity> for Handshake {
    fn from(identity: &Identity) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            role: identity.role,
        }
    }
}
