pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{CliConfig, Command};

pub use crate::adapters::{
    http::HttpCatalog,
    notify::{ChannelNotifier, TracingNotifier},
    storage::{LocalStorage, MemoryStorage},
};
pub use crate::config::CartSettings;
pub use crate::core::{
    cart::{CartStore, DEFAULT_STORAGE_KEY},
    provider::{CartContext, CartProvider},
};
pub use crate::domain::model::{
    AmountUpdate, CartSummary, Notice, Product, ProductId, ProductRecord, Stock,
    UpdateProductAmount,
};
pub use crate::utils::error::{CartError, Result};
