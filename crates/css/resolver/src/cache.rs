//! Bounded least-recently-used memoization of resolution results.
//!
//! Keys are deterministic JSON of `{ namespace, value, options }`, so any option that
//! changes a result also changes its key. Invalid results are stored too: a lookup can
//! hit a value, hit a stored invalid marker, or miss.

use crate::options::ResolveOptions;
use core::mem;
use css_color::ColorValue;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Entries kept by [`ResolveCache::new`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// A memoized result.
#[derive(Clone, Debug, PartialEq)]
pub enum CachedValue {
    Text(String),
    Channels([f64; 4]),
    Color(ColorValue),
    Flag(bool),
}

impl CachedValue {
    /// The text, if this is [`CachedValue::Text`].
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Channels(_) | Self::Color(_) | Self::Flag(_) => None,
        }
    }

    /// The tuple, if this is [`CachedValue::Channels`].
    pub const fn as_channels(&self) -> Option<[f64; 4]> {
        match self {
            Self::Channels(channels) => Some(*channels),
            Self::Text(_) | Self::Color(_) | Self::Flag(_) => None,
        }
    }

    /// The color, if this is [`CachedValue::Color`].
    pub const fn as_color(&self) -> Option<ColorValue> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Text(_) | Self::Channels(_) | Self::Flag(_) => None,
        }
    }

    /// The flag, if this is [`CachedValue::Flag`].
    pub const fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            Self::Text(_) | Self::Channels(_) | Self::Color(_) => None,
        }
    }
}

/// Outcome of a cache lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum CacheLookup<T> {
    /// A stored value.
    Hit(T),
    /// Nothing stored for the key.
    Miss,
    /// The key is known to resolve to an invalid result.
    NegativeHit,
}

#[derive(Serialize)]
struct KeyParts<'key> {
    namespace: &'key str,
    value: &'key str,
    options: &'key ResolveOptions,
}

/// Serialize the cache key for one operation.
///
/// Returns `None` if the options cannot be serialized, in which case the caller skips
/// the cache.
pub fn cache_key(namespace: &str, value: &str, options: &ResolveOptions) -> Option<String> {
    let parts = KeyParts {
        namespace,
        value,
        options,
    };
    serde_json::to_string(&parts)
        .map_err(|error| log::debug!("uncacheable options for {value:?}: {error}"))
        .ok()
}

#[derive(Debug, Default)]
struct Store {
    /// Key → (last use tick, value or invalid marker).
    entries: FxHashMap<String, (u64, Option<CachedValue>)>,
    /// Last use tick → key, oldest first.
    recency: BTreeMap<u64, String>,
    tick: u64,
}

impl Store {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// A thread-safe LRU cache of resolution results.
#[derive(Debug)]
pub struct ResolveCache {
    capacity: usize,
    store: Mutex<Store>,
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveCache {
    /// A cache holding up to [`DEFAULT_CAPACITY`] entries.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A cache holding up to `capacity` entries. Zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            store: Mutex::new(Store::default()),
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Look up `key`, marking it as most recently used.
    pub fn get(&self, key: &str) -> CacheLookup<CachedValue> {
        let mut store = self.store.lock();
        let tick = store.next_tick();
        let Some((last_used, value)) = store.entries.get_mut(key) else {
            log::trace!("cache miss {key}");
            return CacheLookup::Miss;
        };
        let previous = mem::replace(last_used, tick);
        let result = value.clone();
        store.recency.remove(&previous);
        store.recency.insert(tick, key.to_owned());
        match result {
            Some(value) => {
                log::trace!("cache hit {key}");
                CacheLookup::Hit(value)
            }
            None => {
                log::trace!("cache negative hit {key}");
                CacheLookup::NegativeHit
            }
        }
    }

    /// Store `value` for `key`; `None` records an invalid result.
    pub fn set(&self, key: String, value: Option<CachedValue>) {
        if self.capacity == 0 {
            return;
        }
        let mut store = self.store.lock();
        let tick = store.next_tick();
        if let Some((previous, _)) = store.entries.insert(key.clone(), (tick, value)) {
            store.recency.remove(&previous);
        }
        store.recency.insert(tick, key);
        while store.entries.len() > self.capacity {
            let Some((_, oldest)) = store.recency.pop_first() else {
                break;
            };
            log::trace!("cache evict {oldest}");
            store.entries.remove(&oldest);
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.store.lock().entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut store = self.store.lock();
        store.entries.clear();
        store.recency.clear();
    }
}

/// The process-wide cache shared by engines built with [`crate::ColorEngine::new`].
static GLOBAL_CACHE: Lazy<Arc<ResolveCache>> = Lazy::new(|| Arc::new(ResolveCache::new()));

/// A handle to the process-wide cache.
pub fn global_cache() -> Arc<ResolveCache> {
    Arc::clone(&GLOBAL_CACHE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Option<CachedValue> {
        Some(CachedValue::Text(value.to_owned()))
    }

    #[test]
    fn hit_miss_and_negative_hit() {
        let cache = ResolveCache::with_capacity(4);
        assert_eq!(cache.get("a"), CacheLookup::Miss);
        cache.set("a".to_owned(), text("1"));
        cache.set("b".to_owned(), None);
        assert_eq!(cache.get("a"), CacheLookup::Hit(CachedValue::Text("1".to_owned())));
        assert_eq!(cache.get("b"), CacheLookup::NegativeHit);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = ResolveCache::with_capacity(2);
        cache.set("a".to_owned(), text("1"));
        cache.set("b".to_owned(), text("2"));
        assert!(matches!(cache.get("a"), CacheLookup::Hit(_)));
        cache.set("c".to_owned(), text("3"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), CacheLookup::Miss);
        assert!(matches!(cache.get("a"), CacheLookup::Hit(_)));
        assert!(matches!(cache.get("c"), CacheLookup::Hit(_)));
    }

    #[test]
    fn replacing_keeps_one_entry() {
        let cache = ResolveCache::with_capacity(2);
        cache.set("a".to_owned(), text("1"));
        cache.set("a".to_owned(), text("2"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), CacheLookup::Hit(CachedValue::Text("2".to_owned())));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let cache = ResolveCache::with_capacity(0);
        cache.set("a".to_owned(), text("1"));
        assert!(cache.is_empty());
    }

    #[test]
    fn keys_cover_options() {
        let plain = ResolveOptions::new();
        let lab = ResolveOptions::new().with_color_space("lab");
        assert_ne!(cache_key("color", "red", &plain), cache_key("color", "red", &lab));
        assert_ne!(cache_key("color", "red", &plain), cache_key("hex", "red", &plain));
        assert_eq!(cache_key("color", "red", &plain), cache_key("color", "red", &plain));
    }
}
