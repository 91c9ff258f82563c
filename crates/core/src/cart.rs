//! The cart: per-visit, per-campaign speculative selection state.
//!
//! A cart is a plain value owned by exactly one visitor session. Every
//! mutation is validated against freshly computed availability supplied by
//! the caller; a rejected mutation leaves the cart untouched. Nothing here
//! consumes quota -- only order finalization does.

use serde::Serialize;

use crate::quota::ItemAvailability;
use crate::types::DbId;

/// One selected (item, quantity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub item_id: DbId,
    pub product_code: String,
    pub quantity: i64,
}

/// Why a cart mutation was refused.
///
/// `QuotaExceeded` carries the current ceiling so the caller can clamp and
/// retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartRejection {
    NotOrderable,
    QuotaExceeded { max_orderable: i64 },
}

impl CartRejection {
    pub fn code(self) -> &'static str {
        match self {
            Self::NotOrderable => "NOT_ORDERABLE",
            Self::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
        }
    }

    pub fn max_orderable(self) -> Option<i64> {
        match self {
            Self::NotOrderable => None,
            Self::QuotaExceeded { max_orderable } => Some(max_orderable),
        }
    }
}

/// Ordered line collection for one visitor and one campaign.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Quantity of `item_id` currently in the cart, 0 when absent.
    pub fn quantity_of(&self, item_id: DbId) -> i64 {
        self.lines
            .iter()
            .find(|l| l.item_id == item_id)
            .map_or(0, |l| l.quantity)
    }

    /// Add `quantity` units of an item on top of what the cart already holds.
    ///
    /// The proposed total (existing + added) is checked against
    /// `availability.max_orderable`; either the whole mutation applies or the
    /// cart is unchanged. Returns the new line quantity.
    pub fn add(
        &mut self,
        item_id: DbId,
        product_code: &str,
        quantity: i64,
        availability: &ItemAvailability,
    ) -> Result<i64, CartRejection> {
        let proposed = self.quantity_of(item_id) + quantity;
        self.validate(proposed, availability)?;
        self.upsert(item_id, product_code, proposed);
        Ok(proposed)
    }

    /// Set an item's quantity outright. Zero or negative removes the line.
    pub fn set_quantity(
        &mut self,
        item_id: DbId,
        product_code: &str,
        quantity: i64,
        availability: &ItemAvailability,
    ) -> Result<i64, CartRejection> {
        if quantity <= 0 {
            self.remove(item_id);
            return Ok(0);
        }
        self.validate(quantity, availability)?;
        self.upsert(item_id, product_code, quantity);
        Ok(quantity)
    }

    /// Remove an item's line. Returns whether a line was present.
    pub fn remove(&mut self, item_id: DbId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn validate(
        &self,
        proposed: i64,
        availability: &ItemAvailability,
    ) -> Result<(), CartRejection> {
        if !availability.is_orderable {
            return Err(CartRejection::NotOrderable);
        }
        if !availability.max_orderable.allows(proposed) {
            // Exceeding an unbounded ceiling is impossible, so the bound is
            // always present here.
            let max_orderable = availability.max_orderable.bound().unwrap_or(0);
            return Err(CartRejection::QuotaExceeded { max_orderable });
        }
        Ok(())
    }

    fn upsert(&mut self, item_id: DbId, product_code: &str, quantity: i64) {
        match self.lines.iter_mut().find(|l| l.item_id == item_id) {
            Some(line) => line.quantity = quantity,
            None => self.lines.push(CartLine {
                item_id,
                product_code: product_code.to_string(),
                quantity,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quota::{availability, ItemUsage};

    fn avail(max_per_customer: Option<i64>, max_total: Option<i64>) -> ItemAvailability {
        availability(max_per_customer, max_total, ItemUsage::default())
    }

    #[test]
    fn add_upserts_additively() {
        let mut cart = Cart::new();
        let a = avail(Some(10), None);
        assert_eq!(cart.add(1, "P100", 2, &a).unwrap(), 2);
        assert_eq!(cart.add(1, "P100", 3, &a).unwrap(), 5);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(1), 5);
    }

    #[test]
    fn add_beyond_ceiling_rejected_and_cart_unchanged() {
        let mut cart = Cart::new();
        // max_orderable = 1.
        let a = avail(Some(1), Some(5));
        let err = cart.add(1, "P100", 2, &a).unwrap_err();
        assert_eq!(err, CartRejection::QuotaExceeded { max_orderable: 1 });
        assert!(cart.is_empty());
    }

    #[test]
    fn add_not_orderable_rejected() {
        let mut cart = Cart::new();
        let a = availability(
            Some(2),
            Some(2),
            ItemUsage {
                customer_used: 2,
                global_used: 2,
            },
        );
        assert_eq!(cart.add(1, "P100", 1, &a).unwrap_err(), CartRejection::NotOrderable);
        assert!(cart.is_empty());
    }

    #[test]
    fn add_existing_plus_new_checked_against_ceiling() {
        let mut cart = Cart::new();
        let a = avail(Some(3), None);
        cart.add(1, "P100", 2, &a).unwrap();
        // 2 already held + 2 proposed = 4 > 3.
        let err = cart.add(1, "P100", 2, &a).unwrap_err();
        assert_eq!(err, CartRejection::QuotaExceeded { max_orderable: 3 });
        assert_eq!(cart.quantity_of(1), 2);
    }

    #[test]
    fn set_quantity_is_absolute_not_additive() {
        let mut cart = Cart::new();
        let a = avail(Some(3), None);
        cart.add(1, "P100", 2, &a).unwrap();
        // Setting to 3 is within the ceiling even though 2 are already held.
        assert_eq!(cart.set_quantity(1, "P100", 3, &a).unwrap(), 3);
        assert_eq!(cart.quantity_of(1), 3);
    }

    #[test]
    fn set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let a = avail(None, None);
        cart.add(1, "P100", 2, &a).unwrap();
        assert_eq!(cart.set_quantity(1, "P100", 0, &a).unwrap(), 0);
        assert!(cart.is_empty());
        // Negative behaves the same.
        cart.add(1, "P100", 2, &a).unwrap();
        assert_eq!(cart.set_quantity(1, "P100", -4, &a).unwrap(), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn remove_reports_presence() {
        let mut cart = Cart::new();
        let a = avail(None, None);
        cart.add(7, "P700", 1, &a).unwrap();
        assert!(cart.remove(7));
        assert!(!cart.remove(7));
    }

    #[test]
    fn clear_empties_cart() {
        let mut cart = Cart::new();
        let a = avail(None, None);
        cart.add(1, "A", 1, &a).unwrap();
        cart.add(2, "B", 2, &a).unwrap();
        cart.clear();
        assert!(cart.is_empty());
    }
}
