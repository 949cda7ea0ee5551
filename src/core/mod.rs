pub mod cart;
pub mod locks;
pub mod provider;

pub use crate::domain::model::{
    AmountUpdate, CartSummary, Notice, Product, ProductId, ProductRecord, Stock,
    UpdateProductAmount,
};
pub use crate::domain::ports::{CatalogApi, ConfigProvider, Notifier, Storage};
pub use crate::utils::error::Result;
