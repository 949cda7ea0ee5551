use crate::domain::model::{Notice, ProductId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Requested quantity for product {product_id} is out of stock ({requested} requested, {available} available)")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    #[error("API request failed: {0}")]
    Api(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    ApiStatus { url: String, status: u16 },

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Product {0} was not found")]
    ProductNotFound(ProductId),

    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Broad failure classes, used to pick a notice and an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is not acceptable (quantity over stock).
    Validation,
    /// The stock or product lookup failed or returned nothing.
    Lookup,
    /// The operation targets a product that is not in the cart.
    Logical,
    Infrastructure,
    Configuration,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::OutOfStock { .. } => ErrorCategory::Validation,
            CartError::Api(_)
            | CartError::ApiStatus { .. }
            | CartError::InvalidEndpoint(_)
            | CartError::ProductNotFound(_) => ErrorCategory::Lookup,
            CartError::NotInCart(_) => ErrorCategory::Logical,
            CartError::Io(_) | CartError::Serialization(_) | CartError::Storage { .. } => {
                ErrorCategory::Infrastructure
            }
            CartError::ConfigError { .. }
            | CartError::ConfigValidationError { .. }
            | CartError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, CartError::OutOfStock { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Lower the requested quantity or wait for the product to be restocked",
            ErrorCategory::Lookup => "Check that the storefront API is reachable and the product id exists",
            ErrorCategory::Logical => "Add the product to the cart before changing it",
            ErrorCategory::Infrastructure => "Check that the storage path is writable and the saved cart is valid JSON",
            ErrorCategory::Configuration => "Review the command-line flags and the TOML configuration file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::OutOfStock { .. } => Notice::OutOfStock.message().to_string(),
            CartError::NotInCart(id) => format!("Product {} is not in the cart", id),
            CartError::ProductNotFound(id) => format!("Product {} does not exist", id),
            CartError::Api(_) | CartError::ApiStatus { .. } => {
                "The storefront API could not be reached".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
