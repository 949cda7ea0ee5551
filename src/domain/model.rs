use serde::{Deserialize, Serialize};
use std::fmt;

pub type ProductId = u64;

/// A product as served by `/products/{id}` and as stored in the cart.
///
/// `amount` means different things depending on where the value came from:
/// on a lookup record it is whatever the service reports for the product,
/// inside the cart it is the quantity the user selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub amount: u32,
}

/// Product record returned by the lookup service. `amount` is optional there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub image: String,
    #[serde(default)]
    pub amount: Option<u32>,
}

impl ProductRecord {
    /// Turns the lookup record into a cart entry holding `quantity` units.
    pub fn into_cart_entry(self, quantity: u32) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            image: self.image,
            amount: quantity,
        }
    }
}

/// Available quantity reported by `/stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub amount: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Outcome of an amount update that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountUpdate {
    Applied(Vec<Product>),
    /// Non-positive amounts are dropped without touching the cart.
    Ignored,
}

/// The user-facing messages the cart can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    OutOfStock,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::OutOfStock => "Quantidade solicitada fora de estoque",
            Notice::AddFailed => "Erro na adição do produto",
            Notice::RemoveFailed => "Erro na remoção do produto",
            Notice::UpdateFailed => "Erro na alteração de quantidade do produto",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartSummary {
    pub distinct_items: usize,
    pub total_units: u64,
    pub subtotal: f64,
}

impl CartSummary {
    pub fn of(cart: &[Product]) -> Self {
        Self {
            distinct_items: cart.len(),
            total_units: cart.iter().map(|item| u64::from(item.amount)).sum(),
            subtotal: cart.iter().map(|item| item.price * f64::from(item.amount)).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_record_without_amount() {
        let record: ProductRecord = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/1.jpg"
        }))
        .unwrap();

        assert_eq!(record.amount, None);
        let entry = record.into_cart_entry(1);
        assert_eq!(entry.amount, 1);
        assert_eq!(entry.id, 1);
    }

    #[test]
    fn test_stock_payload_with_id() {
        let stock: Stock = serde_json::from_str(r#"{"id": 3, "amount": 2}"#).unwrap();
        assert_eq!(stock.amount, 2);
        assert_eq!(stock.id, Some(3));
    }

    #[test]
    fn test_summary() {
        let cart = vec![
            Product {
                id: 1,
                title: "A".to_string(),
                price: 10.0,
                image: String::new(),
                amount: 2,
            },
            Product {
                id: 2,
                title: "B".to_string(),
                price: 2.5,
                image: String::new(),
                amount: 4,
            },
        ];

        let summary = CartSummary::of(&cart);
        assert_eq!(summary.distinct_items, 2);
        assert_eq!(summary.total_units, 6);
        assert!((summary.subtotal - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(Notice::OutOfStock.to_string(), "Quantidade solicitada fora de estoque");
        assert_eq!(Notice::AddFailed.message(), "Erro na adição do produto");
        assert_eq!(Notice::RemoveFailed.message(), "Erro na remoção do produto");
        assert_eq!(
            Notice::UpdateFailed.message(),
            "Erro na alteração de quantidade do produto"
        );
    }
}
