//! # Cart Session
//!
//! The user's in-progress selection of titles. A cart is an **ordered set**:
//! insertion order is preserved for display, duplicates are refused, and the
//! whole thing lives only as long as the session — checkout clears it, and
//! nothing is ever persisted.
//!
//! Every session gets its own `Cart`; carts are never shared between
//! sessions, so there is no locking story here.
//!
//! ## Quick Example
//! ```rust
//! use bookwyrm::cart::{AddOutcome, Cart};
//!
//! let mut cart = Cart::new();
//! assert_eq!(cart.add("Dune"), AddOutcome::Added);
//! assert_eq!(cart.add("Dune"), AddOutcome::AlreadyInCart);
//!
//! let receipt = cart.checkout(1);
//! assert_eq!(receipt.item_count, 1);
//! assert!(cart.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What happened when a title was added to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The title was appended to the end of the cart.
    Added,
    /// The title was already present; the cart is unchanged.
    AlreadyInCart,
}

/// Proof of purchase, such as it is.
///
/// Pricing is a flat per-book placeholder — no tax, no discounts, no
/// currency conversion.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// How many books were in the cart at checkout.
    pub item_count: usize,
    /// `item_count` × the unit price, in whole currency units.
    pub total_price: u32,
}

/// An ordered, duplicate-free set of titles selected for purchase.
#[derive(Debug, Default, Clone)]
pub struct Cart {
    items: Vec<String>,
}

impl Cart {
    /// Create an empty cart. Every new session starts here.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `title` to the cart, unless it is already there.
    ///
    /// Idempotent: a duplicate add leaves the cart untouched and reports
    /// [`AddOutcome::AlreadyInCart`] so the presentation layer can warn the
    /// user.
    pub fn add(&mut self, title: &str) -> AddOutcome {
        if self.contains(title) {
            warn!("{title:?} is already in the cart");
            return AddOutcome::AlreadyInCart;
        }
        self.items.push(title.to_string());
        AddOutcome::Added
    }

    /// Add every title in `titles`, skipping any already present.
    ///
    /// Returns how many were actually appended. Used for the "add selected
    /// recommendations" and combo-add actions.
    pub fn add_all<I, S>(&mut self, titles: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for title in titles {
            if self.add(title.as_ref()) == AddOutcome::Added {
                added += 1;
            }
        }
        added
    }

    /// Remove `title` from the cart.
    ///
    /// Returns `false` (and does nothing) when the title isn't present.
    pub fn remove(&mut self, title: &str) -> bool {
        match self.items.iter().position(|t| t == title) {
            Some(i) => {
                self.items.remove(i);
                true
            }
            None => false,
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether `title` is currently in the cart.
    pub fn contains(&self, title: &str) -> bool {
        self.items.iter().any(|t| t == title)
    }

    /// The selected titles, in insertion order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of titles in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing has been selected.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check out: price the cart at `unit_price` per book, clear it, and
    /// return the receipt.
    ///
    /// Clearing is unconditional — there is no partial checkout, no inventory
    /// check, and no payment gateway behind this.
    pub fn checkout(&mut self, unit_price: u32) -> Receipt {
        let item_count = self.items.len();
        let receipt = Receipt {
            item_count,
            total_price: item_count as u32 * unit_price,
        };
        info!(
            "Checked out {} books for {} total",
            receipt.item_count, receipt.total_price
        );
        self.items.clear();
        receipt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut once = Cart::new();
        once.add("Dune");

        let mut twice = Cart::new();
        assert_eq!(twice.add("Dune"), AddOutcome::Added);
        assert_eq!(twice.add("Dune"), AddOutcome::AlreadyInCart);

        assert_eq!(once.items(), twice.items());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add("Dune");
        cart.add("Foundation");
        cart.add("Neuromancer");
        assert_eq!(cart.items(), ["Dune", "Foundation", "Neuromancer"]);
    }

    #[test]
    fn test_remove_then_add_moves_to_end() {
        let mut cart = Cart::new();
        cart.add("Dune");
        cart.add("Foundation");

        assert!(cart.remove("Dune"));
        cart.add("Dune");
        assert_eq!(cart.items(), ["Foundation", "Dune"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add("Dune");
        assert!(!cart.remove("Foundation"));
        assert_eq!(cart.items(), ["Dune"]);
    }

    #[test]
    fn test_add_all_skips_duplicates() {
        let mut cart = Cart::new();
        cart.add("Dune");
        let added = cart.add_all(["Dune", "Foundation", "Neuromancer"]);
        assert_eq!(added, 2);
        assert_eq!(cart.items(), ["Dune", "Foundation", "Neuromancer"]);
    }

    #[test]
    fn test_checkout_clears_and_prices() {
        let mut cart = Cart::new();
        cart.add("Dune");
        cart.add("Foundation");

        let receipt = cart.checkout(1);
        assert_eq!(receipt.item_count, 2);
        assert_eq!(receipt.total_price, 2);
        assert!(cart.is_empty());

        // A second checkout rings up nothing.
        let receipt = cart.checkout(1);
        assert_eq!(receipt.item_count, 0);
        assert_eq!(receipt.total_price, 0);
    }

    #[test]
    fn test_checkout_respects_unit_price() {
        let mut cart = Cart::new();
        cart.add("Dune");
        let receipt = cart.checkout(3);
        assert_eq!(receipt.total_price, 3);
    }
}
