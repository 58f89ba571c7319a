//! Cart contents and derived pricing.
//!
//! `CartState` is owned exclusively by the cart actor; everything here is a value
//! type. Totals are recomputed on demand rather than cached, so a stale-total bug
//! is impossible by construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A menu item as served by the restaurant catalog.
///
/// Only the fields the cart needs; the full catalog entry lives behind the REST
/// layer and is not reproduced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub restaurant_id: String,
}

impl MenuItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        restaurant_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: None,
            restaurant_id: restaurant_id.into(),
        }
    }
}

/// A size/preparation variant of a menu item, identified by name.
///
/// Variants carry their own price, which replaces the base item price on the
/// cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub name: String,
    pub price: f64,
}

impl Variant {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// One line of the cart.
///
/// The `id` is unique within the cart and generated by the cart actor. Two adds
/// merge into one line when their line keys match (see [`CartLine::matches_key`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub restaurant_id: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub special_instructions: String,
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// The line key: (menu item, variant name or absence, exact instructions).
    ///
    /// Variants are compared by name only; a price change on the catalog side does
    /// not split an existing line.
    pub fn matches_key(
        &self,
        menu_item_id: &str,
        variant: Option<&Variant>,
        special_instructions: &str,
    ) -> bool {
        self.menu_item_id == menu_item_id
            && self.variant.as_ref().map(|v| v.name.as_str()) == variant.map(|v| v.name.as_str())
            && self.special_instructions == special_instructions
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// The whole cart: ordered lines plus the restaurant they all belong to.
///
/// # Invariant
/// Every line's `restaurant_id` equals `restaurant_id`, and `restaurant_id` is
/// `None` exactly when `lines` is empty. Only the cart actor mutates this type,
/// which is what keeps the invariant enforceable.
///
/// This struct is also the persisted snapshot, serialized as
/// `{ "lines": [...], "restaurantId": ... }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default)]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub restaurant_id: Option<String>,
}

impl CartState {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line quantities.
    pub fn total_item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn delivery_fee(&self, pricing: &PricingConfig) -> f64 {
        if self.subtotal() >= pricing.free_delivery_threshold {
            0.0
        } else {
            pricing.delivery_fee
        }
    }

    pub fn tax(&self, pricing: &PricingConfig) -> f64 {
        self.subtotal() * pricing.tax_rate
    }

    pub fn total(&self, pricing: &PricingConfig) -> f64 {
        self.subtotal() + self.delivery_fee(pricing) + self.tax(pricing)
    }

    /// All derived amounts in one pass, for display.
    pub fn totals(&self, pricing: &PricingConfig) -> CartTotals {
        CartTotals {
            item_count: self.total_item_count(),
            subtotal: self.subtotal(),
            delivery_fee: self.delivery_fee(pricing),
            tax: self.tax(pricing),
            total: self.total(pricing),
        }
    }
}

/// Derived cart amounts. Computed, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub item_count: u32,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
}

/// Pricing knobs for the derived totals.
///
/// Defaults match the production fee schedule: free delivery from 500 upwards,
/// otherwise a flat 40, and 18% tax on the subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingConfig {
    pub free_delivery_threshold: f64,
    pub delivery_fee: f64,
    pub tax_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            free_delivery_threshold: 500.0,
            delivery_fee: 40.0,
            tax_rate: 0.18,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_price: f64, quantity: u32) -> CartLine {
        CartLine {
            id: "line_1".to_string(),
            menu_item_id: "item_1".to_string(),
            name: "Paneer Tikka".to_string(),
            unit_price,
            image_url: None,
            restaurant_id: "rest_1".to_string(),
            quantity,
            variant: None,
            special_instructions: String::new(),
            added_at: Utc::now(),
        }
    }

    fn cart_with(lines: Vec<CartLine>) -> CartState {
        let restaurant_id = lines.first().map(|l| l.restaurant_id.clone());
        CartState {
            lines,
            restaurant_id,
        }
    }

    #[test]
    fn delivery_fee_boundary() {
        let pricing = PricingConfig::default();
        let below = cart_with(vec![line(499.99, 1)]);
        assert_eq!(below.delivery_fee(&pricing), 40.0);
        let at = cart_with(vec![line(500.0, 1)]);
        assert_eq!(at.delivery_fee(&pricing), 0.0);
    }

    #[test]
    fn tax_is_eighteen_percent() {
        let pricing = PricingConfig::default();
        let cart = cart_with(vec![line(100.0, 1)]);
        assert!((cart.tax(&pricing) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn total_identity_holds() {
        let pricing = PricingConfig::default();
        let cart = cart_with(vec![line(120.0, 2), line(80.5, 3)]);
        let totals = cart.totals(&pricing);
        assert!((totals.total - (totals.subtotal + totals.delivery_fee + totals.tax)).abs() < 1e-9);
        assert_eq!(totals.item_count, 5);
    }

    #[test]
    fn line_key_compares_variant_by_name_only() {
        let mut l = line(100.0, 1);
        l.variant = Some(Variant::new("Large", 150.0));
        assert!(l.matches_key("item_1", Some(&Variant::new("Large", 175.0)), ""));
        assert!(!l.matches_key("item_1", Some(&Variant::new("Small", 150.0)), ""));
        assert!(!l.matches_key("item_1", None, ""));
        assert!(!l.matches_key("item_1", Some(&Variant::new("Large", 150.0)), "no onions"));
    }

    #[test]
    fn snapshot_round_trips_with_camel_case_fields() {
        let cart = cart_with(vec![line(99.0, 2)]);
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.contains("\"restaurantId\""));
        assert!(json.contains("\"menuItemId\""));
        let back: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
