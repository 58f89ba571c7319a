//! The realtime channel's event loop.
//!
//! One actor owns the connection lifecycle, both event histories and the
//! outbound send path. Its loop multiplexes three inputs with a fixed
//! priority — identity changes first, then inbound frames, then commands — so
//! an identity change always preempts traffic for the connection it is about
//! to tear down.
//!
//! Each connection gets its own inbound mpsc channel. Tearing a connection
//! down drops that receiver, so frames still in flight for the old identity
//! are discarded instead of bleeding into the new connection.

use crate::model::{ConnectionState, EventHistory, EventKind, Identity, RealtimeEvent};
use crate::ports::{NotificationSink, Severity};
use crate::protocol::{Handshake, InboundFrame, OutboundFrame, PayloadKind};
use crate::transport::{Connection, Transport};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Buffer for the per-connection inbound frame queue.
const INBOUND_BUFFER: usize = 32;

/// Collaborators injected into [`ChannelActor::run`].
pub struct ChannelContext {
    /// Identity signal from the auth gate. A change while connected forces a
    /// teardown and a fresh connection; the gate going away ends the actor.
    pub auth: watch::Receiver<Option<Identity>>,
    pub transport: Arc<dyn Transport>,
    pub notifier: Arc<dyn NotificationSink>,
}

/// Commands the channel actor processes.
///
/// The send/subscribe variants are fire-and-forget: effective while Connected,
/// silently dropped otherwise. Reads answer over a oneshot.
#[derive(Debug)]
pub enum ChannelCommand {
    SendOrderUpdate {
        order_id: String,
        status: String,
        data: Value,
    },
    SendDeliveryLocation {
        order_id: String,
        latitude: f64,
        longitude: f64,
    },
    SubscribeOrder {
        order_id: String,
    },
    SubscribeDelivery {
        order_id: String,
    },
    OrderHistory {
        respond_to: oneshot::Sender<Vec<RealtimeEvent>>,
    },
    DeliveryHistory {
        respond_to: oneshot::Sender<Vec<RealtimeEvent>>,
    },
    State {
        respond_to: oneshot::Sender<ConnectionState>,
    },
}

/// One live transport connection plus its private inbound queue.
struct Link {
    connection: Box<dyn Connection>,
    inbound: mpsc::Receiver<InboundFrame>,
}

/// What a loop iteration woke up for.
enum Step {
    Auth(bool),
    Frame(Option<InboundFrame>),
    Command(Option<ChannelCommand>),
}

/// The actor. Owns the connection state machine and both histories.
pub struct ChannelActor {
    receiver: mpsc::Receiver<ChannelCommand>,
    state: ConnectionState,
    order_history: EventHistory,
    delivery_history: EventHistory,
    link: Option<Link>,
}

impl ChannelActor {
    pub fn new(receiver: mpsc::Receiver<ChannelCommand>) -> Self {
        Self {
            receiver,
            state: ConnectionState::Disconnected,
            order_history: EventHistory::default(),
            delivery_history: EventHistory::default(),
            link: None,
        }
    }

    /// Runs the actor's event loop until the auth gate is dropped or every
    /// client is gone. Always closes the transport on the way out.
    pub async fn run(mut self, ctx: ChannelContext) {
        let ChannelContext {
            mut auth,
            transport,
            notifier,
        } = ctx;
        info!("Realtime channel started");

        // The gate may already hold an identity from before the spawn.
        let initial = auth.borrow_and_update().clone();
        self.apply_identity(initial, transport.as_ref(), notifier.as_ref())
            .await;

        loop {
            let step = {
                let Self { receiver, link, .. } = &mut self;
                tokio::select! {
                    biased;
                    changed = auth.changed() => Step::Auth(changed.is_ok()),
                    frame = recv_frame(link) => Step::Frame(frame),
                    command = receiver.recv() => Step::Command(command),
                }
            };
            match step {
                Step::Auth(true) => {
                    let identity = auth.borrow_and_update().clone();
                    info!(authenticated = identity.is_some(), "Identity changed");
                    self.apply_identity(identity, transport.as_ref(), notifier.as_ref())
                        .await;
                }
                // Auth gate dropped: the owning session is gone.
                Step::Auth(false) => break,
                Step::Frame(Some(frame)) => self.handle_frame(frame, notifier.as_ref()),
                Step::Frame(None) => {
                    // Transport dropped its inbound sender without a disconnect
                    // frame; treat it the same way.
                    warn!("Transport closed inbound stream");
                    self.teardown();
                }
                Step::Command(Some(command)) => self.handle_command(command),
                // All clients dropped.
                Step::Command(None) => break,
            }
        }

        self.teardown();
        info!("Realtime channel shutdown");
    }

    /// Tear down whatever connection exists and, if an identity is present,
    /// open a brand-new one for it. Connections are never reused across
    /// identities.
    async fn apply_identity(
        &mut self,
        identity: Option<Identity>,
        transport: &dyn Transport,
        notifier: &dyn NotificationSink,
    ) {
        self.teardown();
        let Some(identity) = identity else {
            return;
        };

        self.state = ConnectionState::Connecting;
        let (inbound_sender, inbound) = mpsc::channel(INBOUND_BUFFER);
        match transport
            .open(Handshake::from(&identity), inbound_sender)
            .await
        {
            Ok(connection) => {
                info!(user_id = %identity.user_id, "Transport opened, awaiting connect");
                self.link = Some(Link {
                    connection,
                    inbound,
                });
            }
            Err(e) => {
                warn!(error = %e, "Transport open failed");
                notifier.notify("Connection error", Severity::Error);
                self.state = ConnectionState::Disconnected;
            }
        }
    }

    /// Close the transport and discard both histories. Histories are ephemeral
    /// and never persisted.
    fn teardown(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.connection.close();
        }
        self.order_history.clear();
        self.delivery_history.clear();
        self.state = ConnectionState::Disconnected;
    }

    fn handle_frame(&mut self, frame: InboundFrame, notifier: &dyn NotificationSink) {
        match frame {
            InboundFrame::Connect => {
                info!("Transport connected");
                self.state = ConnectionState::Connected;
            }
            InboundFrame::Disconnect => {
                info!("Transport disconnected");
                self.state = ConnectionState::Disconnected;
            }
            InboundFrame::OrderUpdate(payload) => {
                debug!(message = %payload.message, "Order update");
                let tagged = payload.kind == PayloadKind::OrderUpdate;
                let message = payload.message.clone();
                self.order_history
                    .push(RealtimeEvent::now(EventKind::OrderUpdate, payload));
                if tagged {
                    notifier.notify(&message, Severity::Success);
                }
            }
            InboundFrame::DeliveryUpdate(payload) => {
                debug!(message = %payload.message, "Delivery update");
                let tagged = payload.kind == PayloadKind::DeliveryUpdate;
                let message = payload.message.clone();
                self.delivery_history
                    .push(RealtimeEvent::now(EventKind::DeliveryUpdate, payload));
                if tagged {
                    notifier.notify(&message, Severity::Info);
                }
            }
            // Errors are surfaced, not acted on: reconnecting is the
            // transport's job, this layer only follows connect/disconnect.
            InboundFrame::Error(payload) => {
                warn!(message = %payload.message, "Transport error frame");
                notifier.notify("Connection error", Severity::Error);
            }
        }
    }

    fn handle_command(&mut self, command: ChannelCommand) {
        match command {
            ChannelCommand::SendOrderUpdate {
                order_id,
                status,
                data,
            } => self.send_frame(OutboundFrame::order_update(order_id, status, data)),
            ChannelCommand::SendDeliveryLocation {
                order_id,
                latitude,
                longitude,
            } => self.send_frame(OutboundFrame::delivery_location(
                order_id, latitude, longitude,
            )),
            ChannelCommand::SubscribeOrder { order_id } => {
                self.send_frame(OutboundFrame::SubscribeOrder(order_id));
            }
            ChannelCommand::SubscribeDelivery { order_id } => {
                self.send_frame(OutboundFrame::SubscribeDelivery(order_id));
            }
            ChannelCommand::OrderHistory { respond_to } => {
                let _ = respond_to.send(self.order_history.to_vec());
            }
            ChannelCommand::DeliveryHistory { respond_to } => {
                let _ = respond_to.send(self.delivery_history.to_vec());
            }
            ChannelCommand::State { respond_to } => {
                let _ = respond_to.send(self.state);
            }
        }
    }

    /// Emit an outbound frame if and only if the channel is Connected.
    /// Anything else drops the frame: no queueing, no error.
    fn send_frame(&mut self, frame: OutboundFrame) {
        if self.state != ConnectionState::Connected {
            debug!(frame = frame.name(), state = %self.state, "Not connected, dropping outbound frame");
            return;
        }
        if let Some(link) = self.link.as_ref() {
            debug!(frame = frame.name(), "Sending outbound frame");
            if let Err(e) = link.connection.send(frame) {
                warn!(error = %e, "Outbound send failed");
            }
        }
    }
}

/// Next inbound frame of the current connection, or never if there is none.
async fn recv_frame(link: &mut Option<Link>) -> Option<InboundFrame> {
    match link.as_mut() {
        Some(link) => link.inbound.recv().await,
        None => std::future::pending().await,
    }
}
