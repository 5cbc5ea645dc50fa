//! Name-mangling cache
//!
//! The on-disk layout matches the one terser writes, so caches produced by
//! JavaScript tooling load unchanged:
//!
//! ```json
//! { "vars": { "props": {} }, "props": { "props": { "$_priv": "a" } } }
//! ```
//!
//! Keys are the original names with a `$` prefix.

use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

const KEY_PREFIX: char = '$';

/// Mapping from original names to mangled names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMap {
    #[serde(default)]
    pub props: BTreeMap<String, String>,
}

impl NameMap {
    pub fn get(&self, original: &str) -> Option<&str> {
        self.props.get(&cache_key(original)).map(String::as_str)
    }

    pub fn insert(&mut self, original: &str, mangled: impl Into<String>) {
        self.props.insert(cache_key(original), mangled.into());
    }

    pub fn mangled_names(&self) -> impl Iterator<Item = &str> {
        self.props.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}

fn cache_key(original: &str) -> String {
    let mut key = String::with_capacity(original.len() + 1);
    key.push(KEY_PREFIX);
    key.push_str(original);
    key
}

/// Mangling decisions carried between invocations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCache {
    #[serde(default)]
    pub vars: NameMap,
    #[serde(default)]
    pub props: NameMap,
}

impl NameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.vars.len() + self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Caller-owned handle to a name cache.
///
/// Cloning the handle shares the cache. The render adapter reads a snapshot
/// when it derives options and replaces the whole cache after a successful
/// run. Concurrent runs against the same handle are not coordinated: the
/// last run to finish wins.
#[derive(Clone, Default)]
pub struct SharedNameCache {
    inner: Arc<Mutex<NameCache>>,
}

impl SharedNameCache {
    pub fn new(cache: NameCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    /// Copy of the current cache contents
    pub fn snapshot(&self) -> NameCache {
        self.inner.lock().clone()
    }

    /// Replace the cache contents wholesale
    pub fn replace(&self, cache: NameCache) {
        *self.inner.lock() = cache;
    }

    /// Whether both handles point at the same cache
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl From<NameCache> for SharedNameCache {
    fn from(cache: NameCache) -> Self {
        Self::new(cache)
    }
}

impl fmt::Debug for SharedNameCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedNameCache").field(&*self.inner.lock()).finish()
    }
}

impl Serialize for SharedNameCache {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.lock().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SharedNameCache {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        NameCache::deserialize(deserializer).map(Self::new)
    }
}
