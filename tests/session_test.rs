//! Full-session integration tests: both actors, wired by the lifecycle layer.

use foodies_core::lifecycle::{SessionPorts, SessionSystem};
use foodies_core::model::{ConnectionState, Identity, MenuItem, PricingConfig, Role};
use foodies_core::ports::memory::{CannedDecision, MemoryStore, RecordingSink};
use foodies_core::protocol::{InboundFrame, PayloadKind, UpdatePayload};
use foodies_core::transport::mock::MockTransport;
use serde_json::json;
use std::sync::Arc;

fn ports(
    store: Arc<MemoryStore>,
    transport: Arc<MockTransport>,
    sink: Arc<RecordingSink>,
) -> SessionPorts {
    SessionPorts {
        store,
        decisions: Arc::new(CannedDecision::new(true)),
        notifier: sink,
        transport,
    }
}

#[tokio::test]
async fn full_session_flow() {
    let store = Arc::new(MemoryStore::new());
    let transport = Arc::new(MockTransport::new());
    let sink = Arc::new(RecordingSink::new());
    let system = SessionSystem::start(ports(store.clone(), transport.clone(), sink.clone()));

    // Cart side.
    system
        .cart
        .add(MenuItem::new("item_1", "Veg Biryani", 180.0, "rest_1"))
        .await
        .unwrap();
    let totals = system.cart.totals(&PricingConfig::default()).await.unwrap();
    assert_eq!(totals.item_count, 1);
    assert_eq!(totals.delivery_fee, 40.0);

    // Realtime side.
    system.auth.sign_in(Identity::new("user_1", Role::Customer));
    let connection = transport.opened(1).await;
    connection.deliver(InboundFrame::Connect).await;
    assert_eq!(
        system.channel.connection_state().await.unwrap(),
        ConnectionState::Connected
    );

    connection
        .deliver(InboundFrame::OrderUpdate(UpdatePayload::new(
            PayloadKind::OrderUpdate,
            "Order O1 accepted",
        )))
        .await;
    system
        .channel
        .send_order_update("O1", "ACCEPTED", json!({"eta": 25}))
        .await
        .unwrap();

    let history = system.channel.order_updates().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(connection.sent().len(), 1);

    // Shutdown closes the transport and joins both actors.
    system.auth.sign_out();
    system.shutdown().await.unwrap();
    assert!(connection.is_closed());
}

#[tokio::test]
async fn cart_survives_sessions_and_histories_do_not() {
    let store = Arc::new(MemoryStore::new());

    // Session one: fill the cart, receive an event, end the session.
    {
        let transport = Arc::new(MockTransport::new());
        let sink = Arc::new(RecordingSink::new());
        let system = SessionSystem::start(ports(store.clone(), transport.clone(), sink));
        system
            .cart
            .add(MenuItem::new("item_1", "Veg Biryani", 180.0, "rest_1"))
            .await
            .unwrap();
        system.auth.sign_in(Identity::new("user_1", Role::Customer));
        let connection = transport.opened(1).await;
        connection.deliver(InboundFrame::Connect).await;
        connection
            .deliver(InboundFrame::OrderUpdate(UpdatePayload::new(
                PayloadKind::OrderUpdate,
                "Order O1 accepted",
            )))
            .await;
        assert_eq!(system.channel.order_updates().await.unwrap().len(), 1);
        system.shutdown().await.unwrap();
    }

    // Session two: the cart is back, the histories are not.
    let transport = Arc::new(MockTransport::new());
    let sink = Arc::new(RecordingSink::new());
    let system = SessionSystem::start(ports(store, transport.clone(), sink));
    let state = system.cart.view().await.unwrap();
    assert_eq!(state.lines.len(), 1);
    assert_eq!(state.lines[0].name, "Veg Biryani");

    system.auth.sign_in(Identity::new("user_1", Role::Customer));
    let connection = transport.opened(1).await;
    connection.deliver(InboundFrame::Connect).await;
    assert!(system.channel.order_updates().await.unwrap().is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn idle_session_shuts_down_cleanly() {
    let system = SessionSystem::start(ports(
        Arc::new(MemoryStore::new()),
        Arc::new(MockTransport::new()),
        Arc::new(RecordingSink::new()),
    ));
    system.shutdown().await.unwrap();
}
