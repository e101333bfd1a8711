//! Client-side snapshot cache keyed by project and filter set.
//!
//! Holds exactly one snapshot per [`BoardKey`]. Writers replace entries
//! wholesale; observers are told about every change.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::Snapshot;
use crate::query::BoardKey;

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A new snapshot was stored for the key.
    Updated { key: BoardKey },
    /// The entry is still readable but should be refetched.
    Invalidated { key: BoardKey },
    /// The entry was dropped.
    Removed { key: BoardKey },
}

impl CacheEvent {
    #[must_use]
    pub const fn key(&self) -> &BoardKey {
        match self {
            Self::Updated { key } | Self::Invalidated { key } | Self::Removed { key } => key,
        }
    }
}

/// Handle returned by [`BoardCache::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&CacheEvent)>;

struct CacheEntry {
    snapshot: Snapshot,
    stale: bool,
    stored_at: DateTime<Utc>,
}

/// Explicit key-value store of board snapshots with observers.
pub struct BoardCache {
    entries: HashMap<BoardKey, CacheEntry>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl BoardCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            subscribers: Vec::new(),
            next_subscription: 1,
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    #[must_use]
    pub fn get(&self, key: &BoardKey) -> Option<&Snapshot> {
        self.entries.get(key).map(|entry| &entry.snapshot)
    }

    #[must_use]
    pub fn contains(&self, key: &BoardKey) -> bool {
        self.entries.contains_key(key)
    }

    /// True when the entry was invalidated and not refreshed since.
    /// Missing entries count as stale.
    #[must_use]
    pub fn is_stale(&self, key: &BoardKey) -> bool {
        self.entries.get(key).is_none_or(|entry| entry.stale)
    }

    /// When the current snapshot for `key` was stored.
    #[must_use]
    pub fn stored_at(&self, key: &BoardKey) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|entry| entry.stored_at)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&BoardKey> {
        self.entries.keys().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replace the snapshot for `key` and mark it fresh.
    pub fn set(&mut self, key: &BoardKey, snapshot: Snapshot) {
        self.entries.insert(
            key.clone(),
            CacheEntry {
                snapshot,
                stale: false,
                stored_at: Utc::now(),
            },
        );
        self.notify(&CacheEvent::Updated { key: key.clone() });
    }

    /// Mark an entry stale. Returns false if there was nothing to invalidate.
    pub fn invalidate(&mut self, key: &BoardKey) -> bool {
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        entry.stale = true;
        self.notify(&CacheEvent::Invalidated { key: key.clone() });
        true
    }

    /// Mark every entry of a project stale, whatever its filters.
    /// Returns the invalidated keys.
    pub fn invalidate_project(&mut self, project_key: &str) -> Vec<BoardKey> {
        let mut keys: Vec<BoardKey> = self
            .entries
            .keys()
            .filter(|key| key.project_key == project_key)
            .cloned()
            .collect();
        keys.sort();
        for key in &keys {
            self.invalidate(key);
        }
        keys
    }

    pub fn remove(&mut self, key: &BoardKey) -> Option<Snapshot> {
        let removed = self.entries.remove(key)?;
        self.notify(&CacheEvent::Removed { key: key.clone() });
        Some(removed.snapshot)
    }

    // ========================================================================
    // Observers
    // ========================================================================

    /// Register a callback invoked after every cache change.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&CacheEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the subscription was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: &CacheEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }
}

impl Default for BoardCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BoardCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardCache")
            .field("entries", &self.entries.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;
    use crate::query::BoardFilters;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn snapshot(name: &str) -> Snapshot {
        Snapshot::new(vec![Column::new("c1", "todo", name)])
    }

    fn recorder(cache: &mut BoardCache) -> Rc<RefCell<Vec<CacheEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        cache.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_set_and_get() {
        let mut cache = BoardCache::new();
        let key = BoardKey::project("WEB");
        assert!(cache.get(&key).is_none());
        assert!(cache.is_stale(&key));

        cache.set(&key, snapshot("Todo"));
        assert_eq!(cache.get(&key), Some(&snapshot("Todo")));
        assert!(!cache.is_stale(&key));
        assert!(cache.stored_at(&key).is_some());
    }

    #[test]
    fn test_invalidate_keeps_snapshot_readable() {
        let mut cache = BoardCache::new();
        let key = BoardKey::project("WEB");
        cache.set(&key, snapshot("Todo"));

        assert!(cache.invalidate(&key));
        assert!(cache.is_stale(&key));
        assert_eq!(cache.get(&key), Some(&snapshot("Todo")));

        assert!(!cache.invalidate(&BoardKey::project("OTHER")));
    }

    #[test]
    fn test_invalidate_project_covers_all_filters() {
        let mut cache = BoardCache::new();
        let plain = BoardKey::project("WEB");
        let filtered = BoardKey::new(
            "WEB",
            BoardFilters {
                assignee_id: Some("ana".to_string()),
                ..Default::default()
            },
        );
        let other = BoardKey::project("API");
        cache.set(&plain, snapshot("a"));
        cache.set(&filtered, snapshot("b"));
        cache.set(&other, snapshot("c"));

        let keys = cache.invalidate_project("WEB");
        assert_eq!(keys.len(), 2);
        assert!(cache.is_stale(&plain));
        assert!(cache.is_stale(&filtered));
        assert!(!cache.is_stale(&other));
    }

    #[test]
    fn test_subscribers_see_every_change() {
        let mut cache = BoardCache::new();
        let events = recorder(&mut cache);
        let key = BoardKey::project("WEB");

        cache.set(&key, snapshot("Todo"));
        cache.invalidate(&key);
        cache.remove(&key);

        let seen = events.borrow();
        assert_eq!(
            *seen,
            vec![
                CacheEvent::Updated { key: key.clone() },
                CacheEvent::Invalidated { key: key.clone() },
                CacheEvent::Removed { key },
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut cache = BoardCache::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = cache.subscribe(move |_| *sink.borrow_mut() += 1);

        let key = BoardKey::project("WEB");
        cache.set(&key, snapshot("Todo"));
        assert!(cache.unsubscribe(id));
        cache.set(&key, snapshot("Todo"));

        assert_eq!(*count.borrow(), 1);
        assert!(!cache.unsubscribe(id));
    }

    #[test]
    fn test_remove_missing_is_silent() {
        let mut cache = BoardCache::new();
        let events = recorder(&mut cache);
        assert!(cache.remove(&BoardKey::project("WEB")).is_none());
        assert!(events.borrow().is_empty());
    }
}
