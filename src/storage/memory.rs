use std::{collections::BTreeMap, sync::Arc};

use tokio::sync::RwLock;

use crate::blink::Blink;
use crate::error::BlinksError;
use crate::storage::BlinkStore;

/// In-process store for tests and local runs without Redis.
///
/// Lists come back in key order.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    blinks: Arc<RwLock<BTreeMap<String, Blink>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blinks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blinks.read().await.is_empty()
    }
}

impl BlinkStore for MemoryStorage {
    async fn ping(&self) -> Result<(), BlinksError> {
        Ok(())
    }

    async fn insert_blink(&self, blink: &Blink) -> Result<bool, BlinksError> {
        let mut blinks = self.blinks.write().await;
        if blinks.contains_key(&blink.blink_url) {
            return Ok(false);
        }
        blinks.insert(blink.blink_url.clone(), blink.clone());
        Ok(true)
    }

    async fn get_blink(&self, blink_url: &str) -> Result<Option<Blink>, BlinksError> {
        Ok(self.blinks.read().await.get(blink_url).cloned())
    }

    async fn update_redirect_url(
        &self,
        blink_url: &str,
        redirect_url: &str,
    ) -> Result<Option<Blink>, BlinksError> {
        let mut blinks = self.blinks.write().await;
        Ok(blinks.get_mut(blink_url).map(|blink| {
            blink.redirect_url = redirect_url.to_string();
            blink.clone()
        }))
    }

    async fn delete_blink(&self, blink_url: &str) -> Result<bool, BlinksError> {
        Ok(self.blinks.write().await.remove(blink_url).is_some())
    }

    async fn list_blinks(&self) -> Result<Vec<Blink>, BlinksError> {
        Ok(self.blinks.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_refuses_existing_key() {
        let store = MemoryStorage::new();
        let first = Blink::new("go", "https://golang.org");
        let second = Blink::new("go", "https://go.dev");

        assert!(store.insert_blink(&first).await.unwrap());
        assert!(!store.insert_blink(&second).await.unwrap());

        let stored = store.get_blink("go").await.unwrap().unwrap();
        assert_eq!(stored.redirect_url, "https://golang.org");
    }

    #[tokio::test]
    async fn update_only_touches_redirect_url() {
        let store = MemoryStorage::new();
        let blink = Blink {
            blink_url: "go".into(),
            redirect_url: "https://golang.org".into(),
            created_at: "1700000000".into(),
        };
        store.insert_blink(&blink).await.unwrap();

        let updated = store
            .update_redirect_url("go", "https://go.dev")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.redirect_url, "https://go.dev");
        assert_eq!(updated.created_at, "1700000000");

        assert!(
            store
                .update_redirect_url("missing", "https://go.dev")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = MemoryStorage::new();
        store
            .insert_blink(&Blink::new("go", "https://golang.org"))
            .await
            .unwrap();

        assert!(store.delete_blink("go").await.unwrap());
        assert!(!store.delete_blink("go").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_returns_every_blink_in_key_order() {
        let store = MemoryStorage::new();
        for id in ["rust", "go", "zig"] {
            store
                .insert_blink(&Blink::new(id, "https://example.com"))
                .await
                .unwrap();
        }

        let ids: Vec<_> = store
            .list_blinks()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.blink_url)
            .collect();
        assert_eq!(ids, vec!["go", "rust", "zig"]);
        assert_eq!(store.len().await, 3);
    }
}
