//! Cart line items and the ordered cart they live in.

use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// One distinct product in the cart with its desired quantity.
///
/// `amount` is never zero: a line that would drop to zero is removed instead.
///
/// Snapshots saved with the catalog's field names (`title`, `image`) are
/// accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(alias = "title")]
    pub name: String,
    pub price: Price,
    #[serde(alias = "image")]
    pub image_url: String,
    pub amount: NonZeroU32,
}

impl CartLineItem {
    /// Build a line item from catalog metadata.
    #[must_use]
    pub fn from_product(product: Product, amount: NonZeroU32) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image_url: product.image_url,
            amount,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount.get())
    }
}

/// A list of line items mentions the same product twice.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("duplicate line item for product {0}")]
pub struct DuplicateLineItem(pub ProductId);

/// An ordered cart snapshot.
///
/// Line items keep the order in which their products were first added, and
/// there is at most one line item per product. Serializes as a bare JSON
/// array of line items, which is the persisted format; an array that repeats
/// a product is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Parse a persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a JSON array of line items, or if
    /// two line items share a product.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the full cart for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, CartLineItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line item for a product.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Index of the line item for a product.
    #[must_use]
    pub fn position(&self, id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Current amount of a product, zero when absent.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.find(id).map_or(0, |item| item.amount.get())
    }

    /// Append a line item for a product not yet in the cart.
    ///
    /// Returns `false` and leaves the cart untouched if the product already
    /// has a line item.
    pub fn push(&mut self, item: CartLineItem) -> bool {
        if self.position(item.id).is_some() {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Set the amount of an existing line item in place.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn set_amount(&mut self, id: ProductId, amount: NonZeroU32) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.amount = amount;
                true
            }
            None => false,
        }
    }

    /// Remove the line item for a product, keeping the order of the rest.
    pub fn remove(&mut self, id: ProductId) -> Option<CartLineItem> {
        self.position(id).map(|index| self.items.remove(index))
    }

    /// Sum of all line item amounts.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount.get())).sum()
    }

    /// Sum of all line item subtotals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartLineItem::subtotal).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = core::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = DuplicateLineItem;

    fn try_from(items: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        let mut cart = Self::new();
        for item in items {
            let id = item.id;
            if !cart.push(item) {
                return Err(DuplicateLineItem(id));
            }
        }
        Ok(cart)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, cents: i64, amount: u32) -> CartLineItem {
        CartLineItem {
            id: ProductId::new(id),
            name: format!("Shoe {id}"),
            price: Price::from_cents(cents),
            image_url: format!("https://example.com/{id}.jpg"),
            amount: NonZeroU32::new(amount).unwrap(),
        }
    }

    #[test]
    fn test_cart_json_shape() {
        let cart = Cart::try_from(vec![line(1, 17990, 2)]).unwrap();
        let json = cart.to_json().unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Shoe 1","price":"179.90","imageUrl":"https://example.com/1.jpg","amount":2}]"#
        );
        assert_eq!(Cart::from_json(&json).unwrap(), cart);
    }

    #[test]
    fn test_cart_rejects_zero_amount() {
        let json = r#"[{"id":1,"name":"a","price":1,"imageUrl":"","amount":0}]"#;
        assert!(Cart::from_json(json).is_err());
    }

    #[test]
    fn test_cart_rejects_duplicate_product() {
        assert_eq!(
            Cart::try_from(vec![line(1, 100, 1), line(2, 100, 1), line(1, 100, 3)]),
            Err(DuplicateLineItem(ProductId::new(1)))
        );

        let json = serde_json::to_string(&vec![line(7, 100, 1), line(7, 100, 2)]).unwrap();
        assert!(Cart::from_json(&json).is_err());
    }

    #[test]
    fn test_line_item_accepts_catalog_field_names() {
        let json = r#"[{"id":1,"title":"A","price":179.9,"image":"https://x/1.jpg","amount":2}]"#;
        let cart = Cart::from_json(json).unwrap();
        let item = cart.find(ProductId::new(1)).unwrap();
        assert_eq!(item.name, "A");
        assert_eq!(item.image_url, "https://x/1.jpg");
        assert_eq!(item.price, Price::from_cents(17990));
    }

    #[test]
    fn test_push_rejects_duplicate() {
        let mut cart = Cart::new();
        assert!(cart.push(line(1, 100, 1)));
        assert!(!cart.push(line(1, 100, 5)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.amount_of(ProductId::new(1)), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut cart =
            Cart::try_from(vec![line(1, 100, 1), line(2, 100, 1), line(3, 100, 1)]).unwrap();
        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.id, ProductId::new(2));
        let ids: Vec<i32> = cart.iter().map(|item| item.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_totals() {
        let cart = Cart::try_from(vec![line(1, 1000, 2), line(2, 250, 3)]).unwrap();
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.subtotal(), Price::from_cents(2750));
        assert_eq!(Cart::new().subtotal(), Price::ZERO);
    }

    #[test]
    fn test_set_amount() {
        let mut cart = Cart::try_from(vec![line(1, 100, 1)]).unwrap();
        assert!(cart.set_amount(ProductId::new(1), NonZeroU32::new(4).unwrap()));
        assert!(!cart.set_amount(ProductId::new(9), NonZeroU32::new(4).unwrap()));
        assert_eq!(cart.amount_of(ProductId::new(1)), 4);
    }
}
