use super::toml_config::TomlConfig;
use super::CartSettings;
use crate::core::ProductId;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-cart")]
#[command(about = "Shopping cart backed by a storefront stock API")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL of the storefront API [default: http://localhost:3333]
    #[arg(long)]
    pub api_endpoint: Option<String>,

    /// Directory holding the saved cart [default: ./.cart]
    #[arg(long)]
    pub storage_path: Option<String>,

    /// Storage slot name [default: @RocketShoes:cart]
    #[arg(long)]
    pub storage_key: Option<String>,

    /// Per-request timeout for stock and product lookups [default: 10]
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the cart
    List,
    /// Show item count and subtotal
    Summary,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product from the cart
    Remove { product_id: ProductId },
    /// Set the quantity of a product already in the cart
    Update {
        product_id: ProductId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

impl CliConfig {
    /// Defaults, then the `--config` file, then explicit flags.
    pub fn resolve(&self) -> Result<CartSettings> {
        let mut settings = CartSettings::default();

        if let Some(path) = &self.config {
            let file_config = TomlConfig::from_file(path)?;
            file_config.validate()?;
            settings = settings.apply_toml(&file_config);
        }

        if let Some(endpoint) = &self.api_endpoint {
            settings.api_endpoint = endpoint.clone();
        }
        if let Some(path) = &self.storage_path {
            settings.storage_path = path.clone();
        }
        if let Some(key) = &self.storage_key {
            settings.storage_key = key.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        settings.verbose |= self.verbose;
        settings.json_logs |= self.json_logs;

        settings.validate()?;
        Ok(settings)
    }
}
