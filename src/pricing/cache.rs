use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

use super::types::PricingTable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheEntry {
    pub(crate) pricing: PricingTable,
    pub(crate) timestamp: DateTime<Utc>,
}

impl CacheEntry {
    /// Age of the entry, or `None` if its timestamp lies in the future
    pub(crate) fn age(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let age = now.signed_duration_since(self.timestamp);
        (age >= TimeDelta::zero()).then_some(age)
    }
}

/// provider name -> cached table
type CacheFile = BTreeMap<String, CacheEntry>;

/// On-disk pricing cache shared by all providers
#[derive(Debug, Clone)]
pub(crate) struct PricingCache {
    path: PathBuf,
}

impl PricingCache {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn default_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(home.join(".cache").join("ccprice").join("pricing.json"))
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> CacheFile {
        let Ok(file) = File::open(&self.path) else {
            return CacheFile::new();
        };
        match serde_json::from_reader(file) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Ignoring unreadable cache {}: {}", self.path.display(), e);
                CacheFile::new()
            }
        }
    }

    /// Cached entry for `key`, regardless of age
    pub(crate) fn load(&self, key: &str) -> Option<CacheEntry> {
        self.load_all().remove(key)
    }

    pub(crate) fn load_if_fresh(
        &self,
        key: &str,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) -> Option<(CacheEntry, TimeDelta)> {
        let entry = self.load(key)?;
        let age = entry.age(now)?;
        if age > ttl {
            return None;
        }
        Some((entry, age))
    }

    /// Write `entry` under `key`, keeping entries for other providers
    pub(crate) fn store(&self, key: &str, entry: CacheEntry) -> Result<(), PricingError> {
        let mut data = self.load_all();
        data.insert(key.to_string(), entry);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| PricingError::CacheIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut file = File::create(&self.path).map_err(|source| PricingError::CacheIo {
            path: self.path.clone(),
            source,
        })?;
        serde_json::to_writer(&mut file, &data).map_err(PricingError::CacheEncode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::defaults::default_anthropic_pricing;

    fn entry_at(timestamp: DateTime<Utc>) -> CacheEntry {
        CacheEntry {
            pricing: default_anthropic_pricing(),
            timestamp,
        }
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PricingCache::new(dir.path().join("pricing.json"));
        assert!(cache.load("anthropic").is_none());
    }

    #[test]
    fn corrupt_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.json");
        std::fs::write(&path, "{not json").unwrap();
        let cache = PricingCache::new(path);
        assert!(cache.load("anthropic").is_none());
    }

    #[test]
    fn store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PricingCache::new(dir.path().join("nested").join("pricing.json"));
        cache.store("anthropic", entry_at(Utc::now())).unwrap();
        assert!(cache.path().exists());
    }

    #[test]
    fn store_keeps_other_providers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PricingCache::new(dir.path().join("pricing.json"));
        cache.store("anthropic", entry_at(Utc::now())).unwrap();
        cache.store("vertex_ai", entry_at(Utc::now())).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(cache.path()).unwrap()).unwrap();
        assert!(raw.get("anthropic").is_some());
        assert!(raw.get("vertex_ai").is_some());
        assert!(raw["anthropic"].get("pricing").is_some());
        assert!(raw["anthropic"].get("timestamp").is_some());
    }

    #[test]
    fn fresh_entry_within_ttl() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PricingCache::new(dir.path().join("pricing.json"));
        let now = Utc::now();
        cache
            .store("anthropic", entry_at(now - TimeDelta::hours(2)))
            .unwrap();

        let (_, age) = cache
            .load_if_fresh("anthropic", TimeDelta::hours(24), now)
            .expect("fresh entry");
        assert_eq!(age, TimeDelta::hours(2));
    }

    #[test]
    fn expired_entry_is_not_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PricingCache::new(dir.path().join("pricing.json"));
        let now = Utc::now();
        cache
            .store("anthropic", entry_at(now - TimeDelta::hours(25)))
            .unwrap();

        assert!(
            cache
                .load_if_fresh("anthropic", TimeDelta::hours(24), now)
                .is_none()
        );
        assert!(cache.load("anthropic").is_some());
    }

    #[test]
    fn future_timestamp_is_not_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PricingCache::new(dir.path().join("pricing.json"));
        let now = Utc::now();
        cache
            .store("anthropic", entry_at(now + TimeDelta::hours(1)))
            .unwrap();

        assert!(
            cache
                .load_if_fresh("anthropic", TimeDelta::hours(24), now)
                .is_none()
        );
    }
}
