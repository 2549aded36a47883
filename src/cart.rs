use serde::Serialize;

use crate::error::ValidationError;

pub const MIN_QUANTITY: u32 = 1;
pub const MAX_QUANTITY: u32 = 99;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartEntry {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub quantity: u32,
}

/// Result of a full cart reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    AlreadyEmpty,
    Cancelled,
    Cleared { items: u32, books: usize },
}

/// Ephemeral shopping cart keyed by book id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Merges into an existing entry for `id` or appends a new one.
    ///
    /// Quantities outside `1..=99` are rejected and leave the cart untouched, as
    /// is a merge that would push an entry past 99.
    pub fn add_item(
        &mut self,
        id: &str,
        title: &str,
        price: f64,
        quantity: u32,
    ) -> Result<&CartEntry, ValidationError> {
        if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
            return Err(ValidationError::InvalidQuantity);
        }

        let index = match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                let merged = self.entries[index]
                    .quantity
                    .checked_add(quantity)
                    .filter(|total| *total <= MAX_QUANTITY)
                    .ok_or(ValidationError::InvalidQuantity)?;
                self.entries[index].quantity = merged;
                index
            }
            None => {
                self.entries.push(CartEntry {
                    id: id.to_owned(),
                    title: title.to_owned(),
                    price,
                    quantity,
                });
                self.entries.len() - 1
            }
        };
        Ok(&self.entries[index])
    }

    /// Clears every entry at once, but only when `confirm` agrees.
    ///
    /// `confirm` receives the current item and book counts and is not called
    /// for an empty cart.
    pub fn reset_all<F>(&mut self, confirm: F) -> anyhow::Result<ResetOutcome>
    where
        F: FnOnce(u32, usize) -> anyhow::Result<bool>,
    {
        if self.entries.is_empty() {
            return Ok(ResetOutcome::AlreadyEmpty);
        }

        let items = self.total_item_count();
        let books = self.entries.len();
        if !confirm(items, books)? {
            return Ok(ResetOutcome::Cancelled);
        }

        self.entries.clear();
        Ok(ResetOutcome::Cleared { items, books })
    }

    pub fn total_item_count(&self) -> u32 {
        self.entries.iter().map(|entry| entry.quantity).sum()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses dialog input the way `parseInt` does, then range-checks it.
///
/// Leading whitespace and an optional sign are accepted, parsing stops at the
/// first non-digit, and anything without leading digits is rejected.
pub fn parse_quantity(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 || negative {
        return Err(ValidationError::InvalidQuantity);
    }

    let quantity: u32 = rest[..digits_len]
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity)?;
    if !(MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        return Err(ValidationError::InvalidQuantity);
    }
    Ok(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_quantities_leave_cart_unchanged() {
        let mut cart = Cart::default();
        cart.add_item("a", "A", 5.0, 1).expect("valid add");

        assert_eq!(
            cart.add_item("a", "A", 5.0, 0),
            Err(ValidationError::InvalidQuantity)
        );
        assert_eq!(
            cart.add_item("b", "B", 5.0, 150),
            Err(ValidationError::InvalidQuantity)
        );
        assert_eq!(cart.entries().len(), 1);
        assert_eq!(cart.total_item_count(), 1);
    }

    #[test]
    fn repeat_adds_accumulate() {
        let mut cart = Cart::default();
        cart.add_item("a", "A", 5.0, 3).expect("first add");
        let entry = cart.add_item("a", "A", 5.0, 2).expect("second add");

        assert_eq!(entry.quantity, 5);
        assert_eq!(cart.entries().len(), 1);

        cart.add_item("b", "B", 2.0, 1).expect("third add");
        assert_eq!(cart.entries().len(), 2);
        assert_eq!(cart.total_item_count(), 6);
    }

    #[test]
    fn merged_quantity_is_capped_per_entry() {
        let mut cart = Cart::default();
        cart.add_item("a", "A", 5.0, 60).expect("first add");

        assert_eq!(
            cart.add_item("a", "A", 5.0, 60),
            Err(ValidationError::InvalidQuantity)
        );
        assert_eq!(cart.entries()[0].quantity, 60);
        assert_eq!(cart.total_item_count(), 60);

        let entry = cart.add_item("a", "A", 5.0, 39).expect("fills up to the cap");
        assert_eq!(entry.quantity, MAX_QUANTITY);
        assert_eq!(
            cart.add_item("a", "A", 5.0, 1),
            Err(ValidationError::InvalidQuantity)
        );
    }

    #[test]
    fn reset_on_empty_cart_does_not_ask() -> anyhow::Result<()> {
        let mut cart = Cart::default();
        let outcome = cart.reset_all(|_, _| panic!("confirmation must not be requested"))?;
        assert_eq!(outcome, ResetOutcome::AlreadyEmpty);
        Ok(())
    }

    #[test]
    fn reset_respects_confirmation() -> anyhow::Result<()> {
        let mut cart = Cart::default();
        cart.add_item("a", "A", 5.0, 3).expect("add a");
        cart.add_item("b", "B", 5.0, 2).expect("add b");

        assert_eq!(cart.reset_all(|_, _| Ok(false))?, ResetOutcome::Cancelled);
        assert_eq!(cart.total_item_count(), 5);
        assert_eq!(cart.entries().len(), 2);

        let mut asked = None;
        let outcome = cart.reset_all(|items, books| {
            asked = Some((items, books));
            Ok(true)
        })?;
        assert_eq!(asked, Some((5, 2)));
        assert_eq!(outcome, ResetOutcome::Cleared { items: 5, books: 2 });
        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
        Ok(())
    }

    #[test]
    fn parse_quantity_follows_parse_int() {
        assert_eq!(parse_quantity("3"), Ok(3));
        assert_eq!(parse_quantity("  42abc"), Ok(42));
        assert_eq!(parse_quantity("+7"), Ok(7));
        assert_eq!(parse_quantity("99"), Ok(99));
        assert_eq!(parse_quantity("2.9"), Ok(2));
        for bad in ["", "abc", "0", "100", "-3", "150", "99999999999999"] {
            assert_eq!(
                parse_quantity(bad),
                Err(ValidationError::InvalidQuantity),
                "input {bad:?}"
            );
        }
    }
}
