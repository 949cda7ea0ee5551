use crate::domain::model::{Notice, ProductId, ProductRecord, Stock};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only stock and product lookups.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn stock(&self, product_id: ProductId) -> Result<Stock>;

    /// `Ok(None)` when the service has no data for the id.
    async fn product(&self, product_id: ProductId) -> Result<Option<ProductRecord>>;
}

/// String-keyed persistent slots.
pub trait Storage: Send + Sync {
    fn get_item(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;
    fn set_item(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Fire-and-forget user messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

pub trait ConfigProvider: Send + Sync {
    fn api_endpoint(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn storage_key(&self) -> &str;
    fn timeout_seconds(&self) -> u64;

    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds())
    }
}
