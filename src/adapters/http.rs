use crate::domain::model::{ProductId, ProductRecord, Stock};
use crate::domain::ports::{CatalogApi, ConfigProvider};
use crate::utils::error::{CartError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Stock and product lookups against the storefront API.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: Url,
    client: Client,
}

impl HttpCatalog {
    pub fn new(api_endpoint: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(api_endpoint)?;
        // Url::join drops the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.api_endpoint(), config.timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn route(&self, resource: &str, product_id: ProductId) -> Result<Url> {
        Ok(self.base_url.join(&format!("{}/{}", resource, product_id))?)
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<Stock> {
        let url = self.route("stock", product_id)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(CartError::ApiStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<Stock>().await?)
    }

    async fn product(&self, product_id: ProductId) -> Result<Option<ProductRecord>> {
        let url = self.route("products", product_id)?;
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CartError::ApiStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        // A `null` body is the service saying it has nothing for this id.
        Ok(response.json::<Option<ProductRecord>>().await?)
    }
}
