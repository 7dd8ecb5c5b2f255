//! Cache of agent processors.
//!
//! Building a processor is expensive (client setup, agent lookup), so one
//! instance is kept per `(agent_type, agent_id)` and reused across turns.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use concierge_core::Result;

/// Identity of a cached processor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessorKey {
    pub agent_type: String,
    pub agent_id: String,
}

impl ProcessorKey {
    pub fn new(agent_type: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            agent_id: agent_id.into(),
        }
    }
}

impl fmt::Display for ProcessorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.agent_type, self.agent_id)
    }
}

/// A processor tied to a conversation thread that can be rebound.
pub trait ThreadBound {
    fn bind_thread(&self, thread_id: &str);
}

/// Processor instances keyed by [`ProcessorKey`].
pub struct ProcessorCache<P> {
    entries: DashMap<ProcessorKey, Arc<P>>,
}

impl<P> Default for ProcessorCache<P> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<P> ProcessorCache<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ProcessorKey) -> Option<Arc<P>> {
        self.entries.get(key).map(|e| Arc::clone(e.value()))
    }

    /// Return the cached processor, building it with `factory` on a miss.
    ///
    /// A factory error leaves the cache untouched. If two callers race on
    /// the same key, the first insert wins and both get that instance.
    pub fn get_or_create<F>(&self, key: ProcessorKey, factory: F) -> Result<Arc<P>>
    where
        F: FnOnce() -> Result<P>,
    {
        if let Some(hit) = self.get(&key) {
            tracing::debug!(key = %key, "Processor cache hit");
            return Ok(hit);
        }

        tracing::debug!(key = %key, "Processor cache miss, creating processor");
        let created = Arc::new(factory()?);
        let entry = self.entries.entry(key).or_insert(created);
        Ok(Arc::clone(entry.value()))
    }

    /// Remove one processor. Returns whether it was cached.
    pub fn invalidate(&self, key: &ProcessorKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            tracing::debug!(key = %key, "Processor invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: ThreadBound> ProcessorCache<P> {
    /// Like [`get_or_create`](Self::get_or_create), but a cached processor is
    /// rebound to `thread_id` before it is returned.
    ///
    /// Newly created processors are expected to be built for `thread_id`
    /// already.
    pub fn get_or_bind<F>(&self, key: ProcessorKey, thread_id: &str, factory: F) -> Result<Arc<P>>
    where
        F: FnOnce() -> Result<P>,
    {
        if let Some(hit) = self.get(&key) {
            tracing::debug!(key = %key, thread_id = thread_id, "Processor cache hit, rebinding thread");
            hit.bind_thread(thread_id);
            return Ok(hit);
        }
        self.get_or_create(key, factory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::Error;
    use std::sync::Mutex;

    struct Probe {
        thread: Mutex<String>,
    }

    impl Probe {
        fn on(thread: &str) -> Self {
            Self {
                thread: Mutex::new(thread.to_string()),
            }
        }
    }

    impl ThreadBound for Probe {
        fn bind_thread(&self, thread_id: &str) {
            *self.thread.lock().unwrap() = thread_id.to_string();
        }
    }

    #[test]
    fn test_key_display() {
        assert_eq!(ProcessorKey::new("cora", "asst_1").to_string(), "cora_asst_1");
    }

    #[test]
    fn test_get_or_create_reuses_instance() {
        let cache = ProcessorCache::new();
        let key = ProcessorKey::new("cora", "asst_1");

        let first = cache.get_or_create(key.clone(), || Ok(Probe::on("t1"))).unwrap();
        let second = cache
            .get_or_create(key, || -> Result<Probe> { panic!("factory must not run on a hit") })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_factory_error_is_not_cached() {
        let cache: ProcessorCache<Probe> = ProcessorCache::new();
        let key = ProcessorKey::new("cart", "asst_9");

        let err = cache.get_or_create(key.clone(), || Err(Error::agent("no such assistant")));
        assert!(err.is_err());
        assert!(cache.is_empty());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_get_or_bind_rebinds_on_hit() {
        let cache = ProcessorCache::new();
        let key = ProcessorKey::new("inventory_agent", "asst_2");

        let created = cache.get_or_bind(key.clone(), "t1", || Ok(Probe::on("t1"))).unwrap();
        assert_eq!(*created.thread.lock().unwrap(), "t1");

        let hit = cache.get_or_bind(key, "t2", || Ok(Probe::on("unused"))).unwrap();
        assert!(Arc::ptr_eq(&created, &hit));
        assert_eq!(*hit.thread.lock().unwrap(), "t2");
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ProcessorCache::new();
        let a = ProcessorKey::new("cora", "a");
        let b = ProcessorKey::new("cart", "b");
        cache.get_or_create(a.clone(), || Ok(Probe::on("t"))).unwrap();
        cache.get_or_create(b, || Ok(Probe::on("t"))).unwrap();

        assert!(cache.invalidate(&a));
        assert!(!cache.invalidate(&a));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
