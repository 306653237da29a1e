use crate::storage::redis::RedisStorage;

/// Application state shared across all request handlers
///
/// Generic over the storage implementation so handlers can run against
/// Redis in production and the in-memory store in tests.
#[derive(Clone)]
pub struct AppState<Store = RedisStorage> {
    /// Backing store for blinks; one pool created at start-up, cloned per request
    pub store: Store,
}

impl<Store> AppState<Store>
where
    Store: Clone,
{
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}
