use crate::core::locks::ProductLocks;
use crate::domain::model::{AmountUpdate, Product, ProductId, UpdateProductAmount};
use crate::domain::ports::{CatalogApi, Storage};
use crate::utils::error::{CartError, Result};
use std::collections::HashSet;
use tokio::sync::{watch, Mutex};

pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Authoritative cart list plus its persisted mirror.
///
/// Every mutation writes the whole list to the storage slot before the
/// in-memory copy is replaced, so a failed write leaves the cart untouched.
/// Operations on the same product id are serialized through [`ProductLocks`];
/// the final list edit always starts from the current list, so operations on
/// different ids cannot overwrite each other.
pub struct CartStore<C: CatalogApi, S: Storage> {
    catalog: C,
    storage: S,
    storage_key: String,
    items: Mutex<Vec<Product>>,
    state: watch::Sender<Vec<Product>>,
    locks: ProductLocks,
}

impl<C: CatalogApi, S: Storage> CartStore<C, S> {
    /// Builds the store and seeds it from the storage slot.
    ///
    /// An unreadable slot is logged and ignored; it gets overwritten by the
    /// next successful mutation.
    pub async fn load(catalog: C, storage: S, storage_key: impl Into<String>) -> Result<Self> {
        let storage_key = storage_key.into();
        let items = match storage.get_item(&storage_key).await? {
            Some(raw) => match serde_json::from_str::<Vec<Product>>(&raw) {
                Ok(items) => dedupe(items),
                Err(e) => {
                    tracing::warn!("Ignoring unreadable cart in slot '{}': {}", storage_key, e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        tracing::debug!("Hydrated cart with {} item(s) from '{}'", items.len(), storage_key);

        let (state, _) = watch::channel(items.clone());
        Ok(Self {
            catalog,
            storage,
            storage_key,
            items: Mutex::new(items),
            state,
            locks: ProductLocks::new(),
        })
    }

    pub fn cart(&self) -> Vec<Product> {
        self.state.borrow().clone()
    }

    /// Receives the new cart after every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.state.subscribe()
    }

    pub fn pending(&self) -> Vec<ProductId> {
        self.locks.pending()
    }

    pub async fn add_product(&self, product_id: ProductId) -> Result<Vec<Product>> {
        let _guard = self.locks.acquire(product_id).await;

        match self.quantity_of(product_id).await {
            Some(current) => {
                let stock = self.catalog.stock(product_id).await?;
                if current >= stock.amount {
                    tracing::warn!(
                        "Product {} already has {} unit(s) in cart, stock is {}",
                        product_id,
                        current,
                        stock.amount
                    );
                    return Err(CartError::OutOfStock {
                        product_id,
                        requested: i64::from(current) + 1,
                        available: stock.amount,
                    });
                }

                let cart = self
                    .commit(|items| {
                        let entry = items
                            .iter_mut()
                            .find(|item| item.id == product_id)
                            .ok_or(CartError::NotInCart(product_id))?;
                        entry.amount += 1;
                        Ok(())
                    })
                    .await?;
                tracing::info!("Incremented product {} in cart", product_id);
                Ok(cart)
            }
            None => {
                let record = self
                    .catalog
                    .product(product_id)
                    .await?
                    .ok_or(CartError::ProductNotFound(product_id))?;

                // The record's own amount is the only stock figure on this path.
                if let Some(available) = record.amount {
                    if available < 1 {
                        tracing::warn!("Product {} is listed with no units left", product_id);
                        return Err(CartError::OutOfStock {
                            product_id,
                            requested: 1,
                            available,
                        });
                    }
                }

                let mut entry = record.into_cart_entry(1);
                if entry.id != product_id {
                    tracing::debug!(
                        "Lookup for product {} returned id {}, keeping the requested id",
                        product_id,
                        entry.id
                    );
                    entry.id = product_id;
                }

                let cart = self
                    .commit(move |items| {
                        items.push(entry);
                        Ok(())
                    })
                    .await?;
                tracing::info!("Added product {} to cart", product_id);
                Ok(cart)
            }
        }
    }

    pub async fn remove_product(&self, product_id: ProductId) -> Result<Vec<Product>> {
        let _guard = self.locks.acquire(product_id).await;

        let cart = self
            .commit(|items| {
                let before = items.len();
                items.retain(|item| item.id != product_id);
                if items.len() == before {
                    return Err(CartError::NotInCart(product_id));
                }
                Ok(())
            })
            .await?;
        tracing::info!("Removed product {} from cart", product_id);
        Ok(cart)
    }

    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<AmountUpdate> {
        let UpdateProductAmount { product_id, amount } = request;
        if amount <= 0 {
            tracing::debug!("Ignoring non-positive amount {} for product {}", amount, product_id);
            return Ok(AmountUpdate::Ignored);
        }

        let _guard = self.locks.acquire(product_id).await;

        let stock = self.catalog.stock(product_id).await?;
        let out_of_stock = || CartError::OutOfStock {
            product_id,
            requested: amount,
            available: stock.amount,
        };
        if amount > i64::from(stock.amount) {
            tracing::warn!(
                "Requested {} unit(s) of product {}, stock is {}",
                amount,
                product_id,
                stock.amount
            );
            return Err(out_of_stock());
        }
        let quantity = u32::try_from(amount).map_err(|_| out_of_stock())?;

        let cart = self
            .commit(|items| {
                // An id that is not in the cart leaves the list as it is.
                for item in items.iter_mut().filter(|item| item.id == product_id) {
                    item.amount = quantity;
                }
                Ok(())
            })
            .await?;
        tracing::info!("Set product {} amount to {}", product_id, quantity);
        Ok(AmountUpdate::Applied(cart))
    }

    async fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        let items = self.items.lock().await;
        items
            .iter()
            .find(|item| item.id == product_id)
            .map(|item| item.amount)
    }

    /// Applies `mutate` to a copy of the current list, persists it, then
    /// publishes it. Nothing changes if either step fails.
    async fn commit<F>(&self, mutate: F) -> Result<Vec<Product>>
    where
        F: FnOnce(&mut Vec<Product>) -> Result<()>,
    {
        let mut items = self.items.lock().await;
        let mut next = items.clone();
        mutate(&mut next)?;

        self.persist(&next).await?;

        *items = next.clone();
        self.state.send_replace(next.clone());
        Ok(next)
    }

    async fn persist(&self, items: &[Product]) -> Result<()> {
        let payload = serde_json::to_string(items)?;
        tracing::debug!(
            "Persisting {} item(s) to '{}' ({} bytes)",
            items.len(),
            self.storage_key,
            payload.len()
        );
        self.storage.set_item(&self.storage_key, &payload).await
    }
}

fn dedupe(items: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    let total = items.len();
    let unique: Vec<Product> = items.into_iter().filter(|item| seen.insert(item.id)).collect();
    if unique.len() != total {
        tracing::warn!(
            "Dropped {} duplicate entries from the saved cart",
            total - unique.len()
        );
    }
    unique
}
