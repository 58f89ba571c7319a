//! # Foodies Core
//!
//! > The stateful core of a food-delivery client: the cart and the realtime
//! > update channel.
//!
//! Everything else in the app is presentational glue over REST calls. The two
//! subsystems here are the ones with real invariants, and each is built as a
//! Tokio actor: isolated state, sequential message processing, type-safe
//! clients.
//!
//! ## 🗺️ Module Tour
//!
//! - **[`model`]**: pure data — cart lines and pricing, realtime events and
//!   their bounded histories, identities.
//! - **[`ports`]**: the collaborator traits the core consumes (persistence,
//!   conflict decisions, notifications) plus in-memory bindings for tests.
//! - **[`protocol`]** / **[`transport`]**: wire frames and the connection
//!   abstraction, with a mock transport for tests.
//! - **[`cart`]** / **[`channel`]**: the two actors and their clients.
//! - **[`auth`]**: the identity signal the channel observes.
//! - **[`lifecycle`]**: wires a session together and tears it down.
//!
//! ## 🚀 Quick Start
//!
//! ```no_run
//! use foodies_core::lifecycle::{SessionPorts, SessionSystem};
//! use foodies_core::model::{Identity, MenuItem, PricingConfig, Role};
//! use foodies_core::ports::memory::{CannedDecision, MemoryStore, TracingSink};
//! use foodies_core::transport::mock::MockTransport;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let system = SessionSystem::start(SessionPorts {
//!     store: Arc::new(MemoryStore::new()),
//!     decisions: Arc::new(CannedDecision::new(true)),
//!     notifier: Arc::new(TracingSink),
//!     transport: Arc::new(MockTransport::new()),
//! });
//!
//! system.auth.sign_in(Identity::new("user_1", Role::Customer));
//! system
//!     .cart
//!     .add(MenuItem::new("item_1", "Veg Biryani", 180.0, "rest_1"))
//!     .await?;
//! let totals = system.cart.totals(&PricingConfig::default()).await?;
//! println!("subtotal: {}", totals.subtotal);
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task and processes messages
//!   sequentially, so neither the cart state nor the histories ever need a
//!   lock.
//! - Cart snapshot writes happen inline in the cart actor's loop, so a write
//!   can never overwrite newer state with stale data.
//! - The channel actor's loop is biased: identity changes preempt inbound
//!   frames, which preempt commands.
//!
//! ## Failure Philosophy
//!
//! Nothing in this core is fatal. Declined conflicts, unknown line ids,
//! storage failures and transport errors all degrade to "state unchanged"
//! plus, at most, a notification. The only errors clients ever see are
//! actor-communication failures during shutdown.

pub mod auth;
pub mod cart;
pub mod channel;
pub mod lifecycle;
pub mod model;
pub mod ports;
pub mod protocol;
pub mod transport;
