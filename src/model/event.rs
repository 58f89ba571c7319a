//! Realtime events and their bounded histories.

use crate::protocol::UpdatePayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt::Display;

/// How many recent events each history keeps.
pub const HISTORY_CAPACITY: usize = 10;

/// Which stream an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    OrderUpdate,
    DeliveryUpdate,
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::OrderUpdate => write!(f, "order update"),
            EventKind::DeliveryUpdate => write!(f, "delivery update"),
        }
    }
}

/// One inbound status event, as kept in a history buffer.
///
/// Ephemeral: histories are discarded whenever the owning connection is torn
/// down, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeEvent {
    pub kind: EventKind,
    pub payload: UpdatePayload,
    pub received_at: DateTime<Utc>,
}

impl RealtimeEvent {
    pub fn now(kind: EventKind, payload: UpdatePayload) -> Self {
        Self {
            kind,
            payload,
            received_at: Utc::now(),
        }
    }
}

/// Fixed-capacity, newest-first event buffer.
///
/// `push` puts the event at the front and evicts the oldest entry once the
/// buffer is over capacity. Arrival order is preserved: the element at index 0
/// is always the most recently pushed.
#[derive(Debug, Clone)]
pub struct EventHistory {
    events: VecDeque<RealtimeEvent>,
    capacity: usize,
}

impl Default for EventHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl EventHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, event: RealtimeEvent) {
        self.events.push_front(event);
        while self.events.len() > self.capacity {
            self.events.pop_back();
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Newest-first copy of the buffer contents.
    pub fn to_vec(&self) -> Vec<RealtimeEvent> {
        self.events.iter().cloned().collect()
    }
}

/// Lifecycle of a single realtime connection.
///
/// Transitions only ever run Disconnected → Connecting → Connected →
/// Disconnected. A new identity gets a brand-new state; connection state is
/// never resumed across identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting => write!(f, "connecting"),
            ConnectionState::Connected => write!(f, "connected"),
        }
    }
}
