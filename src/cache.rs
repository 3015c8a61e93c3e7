use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard};

use sha2::Digest as _;

use crate::adapt::Level;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    content_hash: String,
    level: Level,
    section_title: String,
}

impl CacheKey {
    /// Keys on the trimmed text, so surrounding whitespace does not matter.
    pub fn new(text: &str, level: Level, section_title: &str) -> Self {
        let mut hasher = sha2::Sha256::new();
        hasher.update(text.trim().as_bytes());
        Self {
            content_hash: hex::encode(hasher.finalize()),
            level,
            section_title: section_title.to_owned(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}",
            self.content_hash,
            self.level.index(),
            self.section_title
        )
    }
}

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<CacheKey, String>,
    order: Vec<CacheKey>,
}

/// Process-wide memo of adapted fragments. Entries never expire; only
/// [`AdaptationCache::clear`] removes them.
#[derive(Debug, Default)]
pub struct AdaptationCache {
    entries: Mutex<Entries>,
}

impl AdaptationCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("adaptation cache lock is poisoned"))
    }

    pub fn get(&self, key: &CacheKey) -> anyhow::Result<Option<String>> {
        Ok(self.lock()?.values.get(key).cloned())
    }

    pub fn put(&self, key: CacheKey, value: String) -> anyhow::Result<()> {
        let mut entries = self.lock()?;
        if !entries.values.contains_key(&key) {
            entries.order.push(key.clone());
        }
        entries.values.insert(key, value);
        Ok(())
    }

    /// Removes every entry and returns how many there were.
    pub fn clear(&self) -> anyhow::Result<usize> {
        let mut entries = self.lock()?;
        let removed = entries.values.len();
        entries.values.clear();
        entries.order.clear();
        Ok(removed)
    }

    pub fn size(&self) -> anyhow::Result<usize> {
        Ok(self.lock()?.values.len())
    }

    /// Up to `limit` keys in insertion order.
    pub fn keys(&self, limit: usize) -> anyhow::Result<Vec<String>> {
        Ok(self
            .lock()?
            .order
            .iter()
            .take(limit)
            .map(ToString::to_string)
            .collect())
    }
}
