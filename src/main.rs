//! Demo: a scripted session against the in-memory collaborators.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use foodies_core::lifecycle::tracing::setup_tracing;
use foodies_core::lifecycle::{SessionPorts, SessionSystem};
use foodies_core::model::{Identity, MenuItem, PricingConfig, Role, Variant};
use foodies_core::ports::memory::{CannedDecision, MemoryStore, TracingSink};
use foodies_core::protocol::{InboundFrame, PayloadKind, UpdatePayload};
use foodies_core::transport::mock::MockTransport;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();
    info!("Starting demo session");

    let transport = Arc::new(MockTransport::new());
    let system = SessionSystem::start(SessionPorts {
        store: Arc::new(MemoryStore::new()),
        decisions: Arc::new(CannedDecision::new(true)),
        notifier: Arc::new(TracingSink),
        transport: transport.clone(),
    });

    let pricing = PricingConfig::default();

    // Build a cart: two adds of the same line merge, a variant splits.
    let span = tracing::info_span!("cart_building");
    async {
        let dosa = MenuItem::new("item_1", "Masala Dosa", 120.0, "rest_1");
        system.cart.add(dosa.clone()).await?;
        system.cart.add(dosa.clone()).await?;
        system
            .cart
            .add_item(
                MenuItem::new("item_2", "Filter Coffee", 40.0, "rest_1"),
                1,
                Some(Variant::new("Large", 60.0)),
                String::new(),
            )
            .await?;
        let totals = system.cart.totals(&pricing).await?;
        info!(
            items = totals.item_count,
            subtotal = totals.subtotal,
            delivery_fee = totals.delivery_fee,
            total = totals.total,
            "Cart built"
        );
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    // Sign in; the channel opens a connection for the identity.
    system.auth.sign_in(Identity::new("user_1", Role::Customer));
    let connection = transport.opened(1).await;
    connection.deliver(InboundFrame::Connect).await;

    // Track an order over the live connection.
    let span = tracing::info_span!("order_tracking");
    async {
        system.channel.subscribe_to_order_updates("order_1").await?;
        connection
            .deliver(InboundFrame::OrderUpdate(
                UpdatePayload::new(PayloadKind::OrderUpdate, "Order order_1 is being prepared")
                    .with_extra("orderId", json!("order_1")),
            ))
            .await;
        system
            .channel
            .send_order_update("order_1", "OUT_FOR_DELIVERY", json!({}))
            .await?;
        let history = system.channel.order_updates().await?;
        info!(events = history.len(), "Order history populated");
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    system.auth.sign_out();
    system.shutdown().await?;
    info!("Demo complete");
    Ok(())
}
