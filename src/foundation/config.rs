use std::time::Duration;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Default number of completed resources remembered by the loader.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 50;
/// Default number of loads allowed in flight at once.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 6;
/// Default navigation debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Construction options for [`crate::AssetLoader`].
pub struct LoaderConfig {
    /// Maximum number of keys kept in the LRU cache.
    pub max_cache_size: usize,
    /// Maximum number of simultaneously active loads.
    pub concurrency_limit: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_cache_size: DEFAULT_MAX_CACHE_SIZE,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

impl LoaderConfig {
    /// Parse a JSON object such as `{"maxCacheSize": 20}`; omitted fields take defaults.
    pub fn from_json_str(json: &str) -> SlidecastResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SlidecastError::config(format!("invalid loader config: {e}")))
    }

    /// Replace zero values with the defaults.
    pub fn normalized(self) -> Self {
        let mut out = self;
        if out.max_cache_size == 0 {
            tracing::debug!("max_cache_size=0, using {DEFAULT_MAX_CACHE_SIZE}");
            out.max_cache_size = DEFAULT_MAX_CACHE_SIZE;
        }
        if out.concurrency_limit == 0 {
            tracing::debug!("concurrency_limit=0, using {DEFAULT_CONCURRENCY_LIMIT}");
            out.concurrency_limit = DEFAULT_CONCURRENCY_LIMIT;
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Construction options for [`crate::Navigator`].
pub struct NavigatorConfig {
    /// Moves closer together than this are refused.
    pub debounce_ms: u64,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl NavigatorConfig {
    /// Debounce window as a [`Duration`].
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
