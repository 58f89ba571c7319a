//! Cart actor integration tests: real actor, in-memory collaborators.

use foodies_core::cart::{CartClient, CartContext, CART_STORAGE_KEY};
use foodies_core::model::{CartState, MenuItem, PricingConfig, Variant};
use foodies_core::ports::memory::{CannedDecision, MemoryStore, RecordingSink};
use foodies_core::ports::Severity;
use std::sync::Arc;
use tokio::task::JoinHandle;

struct CartFixture {
    client: CartClient,
    store: Arc<MemoryStore>,
    decisions: Arc<CannedDecision>,
    sink: Arc<RecordingSink>,
    handle: JoinHandle<()>,
}

fn spawn_cart(decision: bool) -> CartFixture {
    spawn_cart_with_store(decision, Arc::new(MemoryStore::new()))
}

fn spawn_cart_with_store(decision: bool, store: Arc<MemoryStore>) -> CartFixture {
    let decisions = Arc::new(CannedDecision::new(decision));
    let sink = Arc::new(RecordingSink::new());
    let (actor, client) = foodies_core::cart::new(32);
    let handle = tokio::spawn(actor.run(CartContext {
        store: store.clone(),
        decisions: decisions.clone(),
        notifier: sink.clone(),
    }));
    CartFixture {
        client,
        store,
        decisions,
        sink,
        handle,
    }
}

fn item_x() -> MenuItem {
    MenuItem::new("item_x", "Paneer Tikka", 100.0, "rest_1")
}

fn item_y() -> MenuItem {
    MenuItem::new("item_y", "Chicken Biryani", 220.0, "rest_2")
}

/// Every reachable state keeps the single-restaurant invariant.
fn assert_invariant(state: &CartState) {
    match &state.restaurant_id {
        Some(owner) => {
            assert!(!state.lines.is_empty(), "owner set but cart empty");
            for line in &state.lines {
                assert_eq!(&line.restaurant_id, owner);
            }
        }
        None => assert!(state.lines.is_empty(), "cart non-empty without owner"),
    }
}

async fn finish(fixture: CartFixture) {
    drop(fixture.client);
    fixture.handle.await.unwrap();
}

#[tokio::test]
async fn adding_same_line_key_twice_merges() {
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();
    fixture.client.add(item_x()).await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 1);
    assert_eq!(state.lines[0].quantity, 2);
    assert_invariant(&state);

    let messages = fixture.sink.messages();
    assert_eq!(
        messages,
        vec!["Paneer Tikka added to cart", "Paneer Tikka quantity updated"]
    );
    finish(fixture).await;
}

#[tokio::test]
async fn variant_and_instructions_split_lines() {
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();
    fixture
        .client
        .add_item(item_x(), 1, Some(Variant::new("Large", 140.0)), String::new())
        .await
        .unwrap();
    fixture
        .client
        .add_item(item_x(), 1, None, "extra spicy".to_string())
        .await
        .unwrap();

    let state = fixture.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 3);
    // The variant line takes the variant price.
    assert_eq!(state.lines[1].unit_price, 140.0);
    assert_invariant(&state);
    finish(fixture).await;
}

#[tokio::test]
async fn cross_restaurant_add_declined_is_a_no_op() {
    // Scenario A: DecisionProvider answers false.
    let fixture = spawn_cart(false);
    fixture.client.add(item_x()).await.unwrap();
    fixture.client.add(item_y()).await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 1);
    assert_eq!(state.lines[0].menu_item_id, "item_x");
    assert_eq!(state.restaurant_id.as_deref(), Some("rest_1"));
    assert_invariant(&state);

    // The conflict was put to the provider, but nothing was notified for the
    // declined add.
    let prompts = fixture.decisions.prompts();
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].current_restaurant_id, "rest_1");
    assert_eq!(prompts[0].incoming_restaurant_id, "rest_2");
    assert_eq!(fixture.sink.messages(), vec!["Paneer Tikka added to cart"]);
    finish(fixture).await;
}

#[tokio::test]
async fn cross_restaurant_add_accepted_replaces_cart() {
    // Scenario B: DecisionProvider answers true.
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();
    fixture.client.add(item_y()).await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 1);
    assert_eq!(state.lines[0].menu_item_id, "item_y");
    assert_eq!(state.restaurant_id.as_deref(), Some("rest_2"));
    assert_invariant(&state);
    assert_eq!(
        fixture.sink.messages(),
        vec!["Paneer Tikka added to cart", "Chicken Biryani added to cart"]
    );
    finish(fixture).await;
}

#[tokio::test]
async fn non_positive_quantity_removes_the_line() {
    // Scenario C: add qty 2, then update to -1.
    let fixture = spawn_cart(true);
    fixture
        .client
        .add_item(item_x(), 2, None, String::new())
        .await
        .unwrap();
    let line_id = fixture.client.view().await.unwrap().lines[0].id.clone();

    fixture.client.update_quantity(&line_id, -1).await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert!(state.is_empty());
    assert_eq!(state.restaurant_id, None);
    assert_invariant(&state);
    finish(fixture).await;
}

#[tokio::test]
async fn update_quantity_zero_equals_remove() {
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();
    let line_id = fixture.client.view().await.unwrap().lines[0].id.clone();

    fixture.client.update_quantity(&line_id, 0).await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert!(state.is_empty());
    assert_eq!(state.restaurant_id, None);
    assert!(fixture
        .sink
        .messages()
        .contains(&"Item removed from cart".to_string()));
    finish(fixture).await;
}

#[tokio::test]
async fn update_quantity_sets_exact_value() {
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();
    let line_id = fixture.client.view().await.unwrap().lines[0].id.clone();

    fixture.client.update_quantity(&line_id, 7).await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert_eq!(state.lines[0].quantity, 7);

    // Unknown ids are a harmless no-op.
    fixture.client.update_quantity("line_999", 3).await.unwrap();
    assert_eq!(fixture.client.view().await.unwrap().lines[0].quantity, 7);
    finish(fixture).await;
}

#[tokio::test]
async fn removing_unknown_line_still_notifies() {
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();

    fixture.client.remove_item("line_999").await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 1);
    let notifications = fixture.sink.notifications();
    assert!(notifications
        .iter()
        .any(|(m, s)| m == "Item removed from cart" && *s == Severity::Success));
    finish(fixture).await;
}

#[tokio::test]
async fn clear_empties_cart_and_owner() {
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();
    fixture.client.clear().await.unwrap();

    let state = fixture.client.view().await.unwrap();
    assert!(state.is_empty());
    assert_eq!(state.restaurant_id, None);
    assert!(fixture.sink.messages().contains(&"Cart cleared".to_string()));
    finish(fixture).await;
}

#[tokio::test]
async fn totals_follow_the_fee_schedule() {
    let pricing = PricingConfig::default();
    let fixture = spawn_cart(true);

    fixture
        .client
        .add(MenuItem::new("item_a", "Thali", 499.99, "rest_1"))
        .await
        .unwrap();
    let totals = fixture.client.totals(&pricing).await.unwrap();
    assert_eq!(totals.delivery_fee, 40.0);
    assert!((totals.total - (totals.subtotal + totals.delivery_fee + totals.tax)).abs() < 1e-9);

    // Nudge the subtotal over the free-delivery threshold.
    let line_id = fixture.client.view().await.unwrap().lines[0].id.clone();
    fixture.client.remove_item(&line_id).await.unwrap();
    fixture
        .client
        .add(MenuItem::new("item_b", "Family Feast", 500.0, "rest_1"))
        .await
        .unwrap();
    let totals = fixture.client.totals(&pricing).await.unwrap();
    assert_eq!(totals.delivery_fee, 0.0);
    assert!((totals.tax - 90.0).abs() < 1e-9);
    finish(fixture).await;
}

#[tokio::test]
async fn every_mutation_is_persisted() {
    let fixture = spawn_cart(true);
    fixture.client.add(item_x()).await.unwrap();

    let blob = fixture.store.raw(CART_STORAGE_KEY).expect("snapshot written");
    let snapshot: CartState = serde_json::from_str(&blob).unwrap();
    assert_eq!(snapshot, fixture.client.view().await.unwrap());

    fixture.client.clear().await.unwrap();
    let blob = fixture.store.raw(CART_STORAGE_KEY).unwrap();
    let snapshot: CartState = serde_json::from_str(&blob).unwrap();
    assert!(snapshot.is_empty());
    finish(fixture).await;
}

#[tokio::test]
async fn cart_hydrates_from_previous_session() {
    let store = Arc::new(MemoryStore::new());
    let first = spawn_cart_with_store(true, store.clone());
    first.client.add(item_x()).await.unwrap();
    finish(first).await;

    let second = spawn_cart_with_store(true, store);
    let state = second.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 1);
    assert_eq!(state.restaurant_id.as_deref(), Some("rest_1"));
    assert_invariant(&state);

    // New lines keep getting unique ids after hydration.
    second
        .client
        .add(MenuItem::new("item_z", "Gulab Jamun", 60.0, "rest_1"))
        .await
        .unwrap();
    let state = second.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 2);
    assert_ne!(state.lines[0].id, state.lines[1].id);
    finish(second).await;
}

#[tokio::test]
async fn malformed_snapshot_falls_back_to_empty_cart() {
    let store = Arc::new(MemoryStore::new());
    store.seed(CART_STORAGE_KEY, "{not json at all");
    let fixture = spawn_cart_with_store(true, store);

    let state = fixture.client.view().await.unwrap();
    assert!(state.is_empty());
    assert_eq!(state.restaurant_id, None);

    // And the cart is fully usable afterwards.
    fixture.client.add(item_x()).await.unwrap();
    assert_eq!(fixture.client.view().await.unwrap().lines.len(), 1);
    finish(fixture).await;
}

#[tokio::test]
async fn storage_failure_degrades_to_in_memory_operation() {
    let store = Arc::new(MemoryStore::new());
    store.set_failing(true);
    let fixture = spawn_cart_with_store(true, store.clone());

    fixture.client.add(item_x()).await.unwrap();
    fixture.client.add(item_x()).await.unwrap();

    // The in-memory cart is authoritative even though every write failed.
    let state = fixture.client.view().await.unwrap();
    assert_eq!(state.lines.len(), 1);
    assert_eq!(state.lines[0].quantity, 2);
    assert_eq!(store.raw(CART_STORAGE_KEY), None);
    finish(fixture).await;
}
