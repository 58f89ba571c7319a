//! Session orchestration.
//!
//! Actors do not wire themselves together. [`SessionSystem`] is the one place
//! that constructs the auth gate, spawns the cart and channel actors with
//! their collaborators, hands out clients, and takes everything down again.

pub mod tracing;

use crate::auth::AuthGate;
use crate::cart::{CartClient, CartContext};
use crate::channel::{ChannelClient, ChannelContext};
use crate::ports::{DecisionProvider, NotificationSink, PersistencePort};
use crate::transport::Transport;
use ::tracing::{error, info};
use std::sync::Arc;
use thiserror::Error;

const ACTOR_BUFFER: usize = 32;

/// Collaborator bindings for one session.
///
/// Production code binds real storage, a user prompt, a toast surface and a
/// websocket transport; tests and the demo bind the in-memory fakes.
pub struct SessionPorts {
    pub store: Arc<dyn PersistencePort>,
    pub decisions: Arc<dyn DecisionProvider>,
    pub notifier: Arc<dyn NotificationSink>,
    pub transport: Arc<dyn Transport>,
}

/// Errors from session orchestration.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("actor task failed: {0}")]
    ActorTaskFailed(String),
}

/// The per-session runtime: one cart actor, one realtime channel actor, and
/// the auth gate the channel observes.
///
/// # Lifecycle
/// construct (`start`) → use via the clients and the gate → `shutdown`.
/// Shutdown drops the clients and the gate; each actor notices its inputs
/// closing and exits its loop, and the channel closes its transport on the
/// way out.
pub struct SessionSystem {
    pub auth: AuthGate,
    pub cart: CartClient,
    pub channel: ChannelClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl SessionSystem {
    /// Spawns both actors wired to the given ports.
    ///
    /// The cart hydrates its persisted snapshot inside its own task; requests
    /// sent before hydration finishes simply queue behind it.
    pub fn start(ports: SessionPorts) -> Self {
        let auth = AuthGate::new();

        let (cart_actor, cart) = crate::cart::new(ACTOR_BUFFER);
        let cart_handle = tokio::spawn(cart_actor.run(CartContext {
            store: ports.store,
            decisions: ports.decisions,
            notifier: ports.notifier.clone(),
        }));

        let (channel_actor, channel) = crate::channel::new(ACTOR_BUFFER);
        let channel_handle = tokio::spawn(channel_actor.run(ChannelContext {
            auth: auth.subscribe(),
            transport: ports.transport,
            notifier: ports.notifier,
        }));

        Self {
            auth,
            cart,
            channel,
            handles: vec![cart_handle, channel_handle],
        }
    }

    /// Gracefully shuts the session down and waits for both actors to exit.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down session");

        // Dropping the clients closes the actors' request channels; dropping
        // the gate ends the channel actor's identity watch.
        drop(self.cart);
        drop(self.channel);
        drop(self.auth);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::ActorTaskFailed(e.to_string()));
            }
        }

        info!("Session shutdown complete");
        Ok(())
    }
}
