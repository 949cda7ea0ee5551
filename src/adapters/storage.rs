use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::form_urlencoded;

/// File-backed slots: one JSON file per key under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.storage_path().to_string())
    }

    /// Keys like `@RocketShoes:cart` are not valid file names everywhere, so
    /// they are form-urlencoded. The encoding is reversible: distinct keys
    /// never share a file.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        let file_name: String = form_urlencoded::byte_serialize(key.as_bytes()).collect();
        Path::new(&self.base_path).join(format!("{}.json", file_name))
    }
}

impl Storage for LocalStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let full_path = self.slot_path(key);
        match tokio::fs::read_to_string(&full_path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let full_path = self.slot_path(key);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 先寫暫存檔再改名，避免寫到一半的購物車
        let tmp_path = full_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &full_path).await?;
        Ok(())
    }
}

/// In-process slots, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let slots = self.slots.read().await;
        Ok(slots.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self.slots.write().await;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_slot_path_encodes_key() {
        let storage = LocalStorage::new("/tmp/cart".to_string());
        assert_eq!(
            storage.slot_path("@RocketShoes:cart"),
            Path::new("/tmp/cart").join("%40RocketShoes%3Acart.json")
        );
    }

    #[test]
    fn test_distinct_keys_get_distinct_slots() {
        let storage = LocalStorage::new("/tmp/cart".to_string());
        let keys = ["@RocketShoes:cart", "RocketShoes:cart", "RocketShoes_cart", "@@@", "a/b"];

        let paths: HashSet<PathBuf> = keys.iter().map(|key| storage.slot_path(key)).collect();

        assert_eq!(paths.len(), keys.len());
        assert_eq!(storage.slot_path("@@@"), Path::new("/tmp/cart").join("%40%40%40.json"));
        for path in &paths {
            assert_eq!(path.parent(), Some(Path::new("/tmp/cart")));
        }
    }

    #[tokio::test]
    async fn test_colliding_looking_keys_do_not_overwrite_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());

        storage.set_item("@RocketShoes:cart", "[1]").await.unwrap();
        storage.set_item("RocketShoes_cart", "[2]").await.unwrap();

        assert_eq!(
            storage.get_item("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[1]")
        );
        assert_eq!(
            storage.get_item("RocketShoes_cart").await.unwrap().as_deref(),
            Some("[2]")
        );
    }

    #[tokio::test]
    async fn test_local_storage_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").to_str().unwrap().to_string();
        let storage = LocalStorage::new(base);

        assert!(storage.get_item("@RocketShoes:cart").await.unwrap().is_none());

        storage.set_item("@RocketShoes:cart", "[]").await.unwrap();
        storage.set_item("@RocketShoes:cart", "[1]").await.unwrap();

        assert_eq!(
            storage.get_item("@RocketShoes:cart").await.unwrap().as_deref(),
            Some("[1]")
        );
        assert!(!storage.slot_path("@RocketShoes:cart").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_memory_storage_is_shared_between_clones() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set_item("key", "value").await.unwrap();

        assert_eq!(other.get_item("key").await.unwrap().as_deref(), Some("value"));
        assert!(other.get_item("missing").await.unwrap().is_none());
    }
}
