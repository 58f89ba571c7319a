//! The cart actor's message loop and mutation logic.
//!
//! # Concurrency model
//! The actor processes one request at a time from its mpsc inbox, so the cart
//! needs no locks, and the persistence contract ("a later write never clobbers
//! newer state") holds structurally: each snapshot write happens inline in the
//! loop, after the mutation that caused it and before the next one is even read.

use crate::model::{CartLine, CartState, MenuItem, Variant};
use crate::ports::{ConflictPrompt, DecisionProvider, NotificationSink, PersistencePort, Severity};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Storage key for the persisted cart snapshot.
pub const CART_STORAGE_KEY: &str = "cart";

/// Collaborators injected into [`CartActor::run`].
///
/// Late binding, same as the actor framework's context injection: the actor is
/// constructed bare and only learns its dependencies when the loop starts.
pub struct CartContext {
    pub store: Arc<dyn PersistencePort>,
    pub decisions: Arc<dyn DecisionProvider>,
    pub notifier: Arc<dyn NotificationSink>,
}

/// Requests the cart actor processes.
///
/// Every mutation answers with `()` once it (and its snapshot write) has been
/// handled, so callers can sequence follow-up reads without racing the actor.
#[derive(Debug)]
pub enum CartRequest {
    AddItem {
        item: MenuItem,
        quantity: u32,
        variant: Option<Variant>,
        special_instructions: String,
        respond_to: oneshot::Sender<()>,
    },
    UpdateQuantity {
        line_id: String,
        /// Zero or negative routes to removal.
        quantity: i64,
        respond_to: oneshot::Sender<()>,
    },
    RemoveItem {
        line_id: String,
        respond_to: oneshot::Sender<()>,
    },
    Clear {
        respond_to: oneshot::Sender<()>,
    },
    View {
        respond_to: oneshot::Sender<CartState>,
    },
}

/// The actor. Owns the cart state and the receiver end of the request channel.
pub struct CartActor {
    receiver: mpsc::Receiver<CartRequest>,
    state: CartState,
    next_line_id: u64,
}

impl CartActor {
    pub fn new(receiver: mpsc::Receiver<CartRequest>) -> Self {
        Self {
            receiver,
            state: CartState::default(),
            next_line_id: 1,
        }
    }

    /// Runs the actor's event loop until every client is dropped.
    ///
    /// Hydrates from the persisted snapshot first; an absent or malformed
    /// snapshot falls back to an empty cart rather than failing startup.
    pub async fn run(mut self, ctx: CartContext) {
        self.state = hydrate(ctx.store.as_ref()).await;
        self.next_line_id = next_line_id_after(&self.state);
        info!(lines = self.state.lines.len(), "Cart actor started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                CartRequest::AddItem {
                    item,
                    quantity,
                    variant,
                    special_instructions,
                    respond_to,
                } => {
                    debug!(item = %item.id, quantity, "AddItem");
                    self.add_item(&ctx, item, quantity, variant, special_instructions)
                        .await;
                    let _ = respond_to.send(());
                }
                CartRequest::UpdateQuantity {
                    line_id,
                    quantity,
                    respond_to,
                } => {
                    debug!(%line_id, quantity, "UpdateQuantity");
                    self.update_quantity(&ctx, &line_id, quantity).await;
                    let _ = respond_to.send(());
                }
                CartRequest::RemoveItem {
                    line_id,
                    respond_to,
                } => {
                    debug!(%line_id, "RemoveItem");
                    self.remove_item(&ctx, &line_id).await;
                    let _ = respond_to.send(());
                }
                CartRequest::Clear { respond_to } => {
                    debug!("Clear");
                    self.clear(&ctx).await;
                    let _ = respond_to.send(());
                }
                CartRequest::View { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
            }
        }

        info!(lines = self.state.lines.len(), "Cart actor shutdown");
    }

    async fn add_item(
        &mut self,
        ctx: &CartContext,
        item: MenuItem,
        quantity: u32,
        variant: Option<Variant>,
        special_instructions: String,
    ) {
        let incoming = item.restaurant_id.clone();

        // Cross-restaurant conflict: the cart belongs to one restaurant at a
        // time. The user decides whether to abandon the current cart.
        if let Some(current) = self.state.restaurant_id.clone() {
            if !self.state.lines.is_empty() && current != incoming {
                let prompt = ConflictPrompt {
                    current_restaurant_id: current,
                    incoming_restaurant_id: incoming.clone(),
                    item_name: item.name.clone(),
                };
                if !ctx.decisions.ask(&prompt).await {
                    debug!(item = %item.id, "Cross-restaurant add declined, cart unchanged");
                    return;
                }
                let name = item.name.clone();
                let line = self.new_line(item, quantity, variant, special_instructions);
                self.state.lines = vec![line];
                self.state.restaurant_id = Some(incoming);
                info!(restaurant = ?self.state.restaurant_id, "Cart replaced for new restaurant");
                ctx.notifier
                    .notify(&format!("{name} added to cart"), Severity::Success);
                self.persist(ctx).await;
                return;
            }
        }

        if self.state.restaurant_id.is_none() {
            self.state.restaurant_id = Some(incoming);
        }

        let existing = self
            .state
            .lines
            .iter_mut()
            .find(|l| l.matches_key(&item.id, variant.as_ref(), &special_instructions));

        if let Some(line) = existing {
            line.quantity += quantity;
            info!(line = %line.id, quantity = line.quantity, "Merged into existing line");
            ctx.notifier
                .notify(&format!("{} quantity updated", item.name), Severity::Success);
        } else {
            let name = item.name.clone();
            let line = self.new_line(item, quantity, variant, special_instructions);
            info!(line = %line.id, "Line added");
            self.state.lines.push(line);
            ctx.notifier
                .notify(&format!("{name} added to cart"), Severity::Success);
        }
        self.persist(ctx).await;
    }

    async fn update_quantity(&mut self, ctx: &CartContext, line_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(ctx, line_id).await;
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.state.lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
            self.persist(ctx).await;
        } else {
            debug!(%line_id, "UpdateQuantity for unknown line, no-op");
        }
    }

    async fn remove_item(&mut self, ctx: &CartContext, line_id: &str) {
        let before = self.state.lines.len();
        self.state.lines.retain(|l| l.id != line_id);
        let removed = self.state.lines.len() != before;
        if removed {
            if self.state.lines.is_empty() {
                self.state.restaurant_id = None;
            }
            self.persist(ctx).await;
        } else {
            debug!(%line_id, "RemoveItem for unknown line, no-op");
        }
        // Removal feedback is idempotent: the line is gone either way.
        ctx.notifier
            .notify("Item removed from cart", Severity::Success);
    }

    async fn clear(&mut self, ctx: &CartContext) {
        self.state.lines.clear();
        self.state.restaurant_id = None;
        ctx.notifier.notify("Cart cleared", Severity::Success);
        self.persist(ctx).await;
    }

    fn new_line(
        &mut self,
        item: MenuItem,
        quantity: u32,
        variant: Option<Variant>,
        special_instructions: String,
    ) -> CartLine {
        let id = format!("line_{}", self.next_line_id);
        self.next_line_id += 1;
        let unit_price = variant.as_ref().map_or(item.price, |v| v.price);
        CartLine {
            id,
            menu_item_id: item.id,
            name: item.name,
            unit_price,
            image_url: item.image_url,
            restaurant_id: item.restaurant_id,
            quantity,
            variant,
            special_instructions,
            added_at: Utc::now(),
        }
    }

    /// Write the current state through the persistence port.
    ///
    /// A failed write is logged and swallowed: the in-memory cart stays
    /// authoritative for this session.
    async fn persist(&self, ctx: &CartContext) {
        match serde_json::to_string(&self.state) {
            Ok(blob) => {
                if let Err(e) = ctx.store.set(CART_STORAGE_KEY, blob).await {
                    warn!(error = %e, "Cart snapshot write failed, keeping in-memory state");
                }
            }
            Err(e) => warn!(error = %e, "Cart snapshot could not be serialized"),
        }
    }
}

/// Load the persisted snapshot, falling back to an empty cart on absence,
/// malformed data, or storage failure.
async fn hydrate(store: &dyn PersistencePort) -> CartState {
    match store.get(CART_STORAGE_KEY).await {
        Ok(Some(blob)) => match serde_json::from_str::<CartState>(&blob) {
            Ok(state) => {
                let state = normalize(state);
                info!(lines = state.lines.len(), "Cart hydrated from snapshot");
                state
            }
            Err(e) => {
                warn!(error = %e, "Persisted cart snapshot is malformed, starting empty");
                CartState::default()
            }
        },
        Ok(None) => CartState::default(),
        Err(e) => {
            warn!(error = %e, "Cart snapshot read failed, starting empty");
            CartState::default()
        }
    }
}

/// Re-establish the owner-restaurant invariant on a snapshot that predates it
/// or was hand-edited.
fn normalize(mut state: CartState) -> CartState {
    if state.lines.is_empty() {
        state.restaurant_id = None;
    } else if state.restaurant_id.is_none() {
        state.restaurant_id = Some(state.lines[0].restaurant_id.clone());
    }
    state
}

/// First line id that cannot collide with any hydrated line.
fn next_line_id_after(state: &CartState) -> u64 {
    state
        .lines
        .iter()
        .filter_map(|l| l.id.strip_prefix("line_")?.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1)
}
