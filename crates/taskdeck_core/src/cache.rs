//! Presentation-tier query cache.
//!
//! # Responsibility
//! - Hold short-lived read results keyed by a fixed cache key.
//! - Drop cached entries when the task service signals a data change.
//!
//! # Invariants
//! - The cache is never authoritative; storage remains the source of truth.
//! - Failed loads are never cached.

use crate::service::task_service::ChangeSignal;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Explicit invalidate-on-write read cache.
///
/// Not a global singleton: callers construct one and pass it (usually via
/// `Rc`) to both the reading side and a [`CacheInvalidator`].
#[derive(Debug, Default)]
pub struct QueryCache<T: Clone> {
    entries: RefCell<HashMap<&'static str, T>>,
}

impl<T: Clone> QueryCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key`, or runs `loader` and caches its
    /// success.
    pub fn fetch_or_load<E>(
        &self,
        key: &'static str,
        loader: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        if let Some(value) = self.entries.borrow().get(key) {
            return Ok(value.clone());
        }

        let value = loader()?;
        self.entries.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// Drops the entry for `key`; the next fetch re-loads.
    pub fn invalidate(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }

    /// Whether `key` currently holds a cached value. Test hook.
    pub fn is_cached(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

/// Change-signal adapter that invalidates one fixed cache key on every
/// data-changed notification.
pub struct CacheInvalidator<T: Clone> {
    cache: Rc<QueryCache<T>>,
    key: &'static str,
}

impl<T: Clone> CacheInvalidator<T> {
    pub fn new(cache: Rc<QueryCache<T>>, key: &'static str) -> Self {
        Self { cache, key }
    }
}

impl<T: Clone> ChangeSignal for CacheInvalidator<T> {
    fn data_changed(&self) {
        self.cache.invalidate(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheInvalidator, QueryCache};
    use crate::service::task_service::ChangeSignal;
    use std::cell::Cell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[test]
    fn fetch_or_load_caches_success_and_skips_loader_while_cached() {
        let cache = QueryCache::new();
        let loads = Cell::new(0u32);
        let load = || -> Result<Vec<u32>, Infallible> {
            loads.set(loads.get() + 1);
            Ok(vec![1, 2, 3])
        };

        assert_eq!(cache.fetch_or_load("items", load).unwrap(), vec![1, 2, 3]);
        assert_eq!(cache.fetch_or_load("items", load).unwrap(), vec![1, 2, 3]);
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new();

        let result = cache.fetch_or_load("items", || Err("storage down"));
        assert_eq!(result.unwrap_err(), "storage down");
        assert!(!cache.is_cached("items"));
    }

    #[test]
    fn invalidate_forces_reload() {
        let cache = QueryCache::new();
        let loads = Cell::new(0u32);
        let load = || -> Result<u32, Infallible> {
            loads.set(loads.get() + 1);
            Ok(loads.get())
        };

        assert_eq!(cache.fetch_or_load("count", load).unwrap(), 1);
        cache.invalidate("count");
        assert_eq!(cache.fetch_or_load("count", load).unwrap(), 2);
    }

    #[test]
    fn invalidator_drops_only_its_key() {
        let cache = Rc::new(QueryCache::new());
        cache
            .fetch_or_load("a", || Ok::<_, Infallible>(1))
            .unwrap();
        cache
            .fetch_or_load("b", || Ok::<_, Infallible>(2))
            .unwrap();

        let signal = CacheInvalidator::new(Rc::clone(&cache), "a");
        signal.data_changed();

        assert!(!cache.is_cached("a"));
        assert!(cache.is_cached("b"));
    }
}
