use crate::core::cart::CartStore;
use crate::domain::model::{
    AmountUpdate, CartSummary, Notice, Product, ProductId, UpdateProductAmount,
};
use crate::domain::ports::{CatalogApi, Notifier, Storage};
use crate::utils::error::{CartError, Result};
use std::sync::Arc;
use tokio::sync::watch;

/// Owns the cart for as long as it is mounted and hands out handles to it.
pub struct CartProvider<C: CatalogApi, S: Storage, N: Notifier> {
    context: CartContext<C, S, N>,
}

impl<C: CatalogApi, S: Storage, N: Notifier> CartProvider<C, S, N> {
    /// Hydrates the cart from `storage_key` and wires it to `notifier`.
    pub async fn mount(
        catalog: C,
        storage: S,
        notifier: N,
        storage_key: impl Into<String>,
    ) -> Result<Self> {
        let store = CartStore::load(catalog, storage, storage_key).await?;
        Ok(Self {
            context: CartContext {
                store: Arc::new(store),
                notifier: Arc::new(notifier),
            },
        })
    }

    pub fn use_cart(&self) -> CartContext<C, S, N> {
        self.context.clone()
    }
}

/// The consumer-facing cart API.
///
/// Failures are turned into notices here; the result is still returned so the
/// caller can react to it as well.
pub struct CartContext<C: CatalogApi, S: Storage, N: Notifier> {
    store: Arc<CartStore<C, S>>,
    notifier: Arc<N>,
}

impl<C: CatalogApi, S: Storage, N: Notifier> Clone for CartContext<C, S, N> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<C: CatalogApi, S: Storage, N: Notifier> CartContext<C, S, N> {
    pub fn cart(&self) -> Vec<Product> {
        self.store.cart()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Product>> {
        self.store.subscribe()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.store.cart())
    }

    /// Products with an add, remove or update still waiting on the network.
    pub fn pending(&self) -> Vec<ProductId> {
        self.store.pending()
    }

    pub async fn add_product(&self, product_id: ProductId) -> Result<Vec<Product>> {
        let result = self.store.add_product(product_id).await;
        if let Err(e) = &result {
            self.report(e, Notice::AddFailed);
        }
        result
    }

    pub async fn remove_product(&self, product_id: ProductId) -> Result<Vec<Product>> {
        let result = self.store.remove_product(product_id).await;
        if let Err(e) = &result {
            tracing::warn!("Remove of product {} failed: {}", product_id, e);
            self.notifier.notify(Notice::RemoveFailed);
        }
        result
    }

    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<AmountUpdate> {
        let result = self.store.update_product_amount(request).await;
        if let Err(e) = &result {
            self.report(e, Notice::UpdateFailed);
        }
        result
    }

    fn report(&self, error: &CartError, fallback: Notice) {
        let notice = if error.is_out_of_stock() {
            Notice::OutOfStock
        } else {
            fallback
        };
        tracing::warn!("Cart operation failed ({:?}): {}", error.category(), error);
        self.notifier.notify(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::cart::tests::MockCatalog;
    use crate::core::cart::DEFAULT_STORAGE_KEY;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.lock().unwrap().push(notice);
        }
    }

    type TestContext = CartContext<MockCatalog, MemoryStorage, RecordingNotifier>;

    async fn mount(catalog: MockCatalog) -> TestContext {
        CartProvider::mount(
            catalog,
            MemoryStorage::new(),
            RecordingNotifier::default(),
            DEFAULT_STORAGE_KEY,
        )
        .await
        .unwrap()
        .use_cart()
    }

    fn notices(context: &TestContext) -> Vec<Notice> {
        context.notifier.notices.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_successful_operations_raise_no_notice() {
        let cart = mount(MockCatalog::new().with_product(1, 100.0, 3)).await;

        cart.add_product(1).await.unwrap();
        cart.add_product(1).await.unwrap();
        cart.update_product_amount(UpdateProductAmount {
            product_id: 1,
            amount: 3,
        })
        .await
        .unwrap();

        assert!(notices(&cart).is_empty());
        let summary = cart.summary();
        assert_eq!(summary.distinct_items, 1);
        assert_eq!(summary.total_units, 3);
        assert!((summary.subtotal - 300.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_add_over_stock_raises_out_of_stock() {
        let cart = mount(MockCatalog::new().with_product(1, 10.0, 1)).await;

        cart.add_product(1).await.unwrap();
        assert!(cart.add_product(1).await.is_err());

        assert_eq!(notices(&cart), vec![Notice::OutOfStock]);
    }

    #[tokio::test]
    async fn test_add_lookup_failure_raises_add_failed() {
        let catalog = MockCatalog::new();
        catalog.set_failing(true);
        let cart = mount(catalog).await;

        assert!(cart.add_product(1).await.is_err());
        assert!(cart.add_product(2).await.is_err());

        assert_eq!(notices(&cart), vec![Notice::AddFailed, Notice::AddFailed]);
        assert!(cart.cart().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_raises_remove_failed() {
        let cart = mount(MockCatalog::new()).await;

        assert!(cart.remove_product(3).await.is_err());

        assert_eq!(notices(&cart), vec![Notice::RemoveFailed]);
    }

    #[tokio::test]
    async fn test_update_notices() {
        let catalog = MockCatalog::new().with_product(1, 10.0, 2);
        let cart = mount(catalog.clone()).await;
        cart.add_product(1).await.unwrap();

        let ignored = cart
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 0,
            })
            .await
            .unwrap();
        assert_eq!(ignored, AmountUpdate::Ignored);
        assert!(notices(&cart).is_empty());

        assert!(cart
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 3,
            })
            .await
            .is_err());

        catalog.set_failing(true);
        assert!(cart
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 2,
            })
            .await
            .is_err());

        assert_eq!(
            notices(&cart),
            vec![Notice::OutOfStock, Notice::UpdateFailed]
        );
        assert_eq!(cart.cart()[0].amount, 1);
    }

    #[tokio::test]
    async fn test_update_of_absent_product_follows_stock_check() {
        let cart = mount(MockCatalog::new().with_product(1, 10.0, 2)).await;

        let err = cart
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 3,
            })
            .await
            .unwrap_err();
        assert!(err.is_out_of_stock());
        assert_eq!(notices(&cart), vec![Notice::OutOfStock]);

        let outcome = cart
            .update_product_amount(UpdateProductAmount {
                product_id: 1,
                amount: 2,
            })
            .await
            .unwrap();
        assert_eq!(outcome, AmountUpdate::Applied(Vec::new()));
        assert_eq!(notices(&cart), vec![Notice::OutOfStock]);
        assert!(cart.cart().is_empty());
    }

    #[tokio::test]
    async fn test_handles_share_one_cart() {
        let provider = CartProvider::mount(
            MockCatalog::new().with_product(1, 10.0, 2),
            MemoryStorage::new(),
            RecordingNotifier::default(),
            DEFAULT_STORAGE_KEY,
        )
        .await
        .unwrap();

        let header = provider.use_cart();
        let page = provider.use_cart();
        page.add_product(1).await.unwrap();

        assert_eq!(header.cart(), page.cart());
        assert_eq!(header.summary().distinct_items, 1);
    }
}
