//! Per-device `LINK_MAX` lookup, probed lazily via `pathconf` with a
//! conservative fallback when introspection is unavailable (§9 open
//! question).

use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_LINK_MAX: u64 = 65_000;

#[derive(Debug, Default)]
pub struct LinkMaxTable {
    by_dev: HashMap<u64, u64>,
}

impl LinkMaxTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the cached `LINK_MAX` for `dev`, defaulting to
    /// [`DEFAULT_LINK_MAX`] if it has not been probed yet.
    pub fn get(&self, dev: u64) -> u64 {
        self.by_dev.get(&dev).copied().unwrap_or(DEFAULT_LINK_MAX)
    }

    /// Probes `LINK_MAX` for the filesystem backing `sample_path` and
    /// caches it under `dev`. Safe to call repeatedly; only the first
    /// call per device does any work.
    #[cfg(unix)]
    pub fn probe(&mut self, dev: u64, sample_path: &Path) {
        if self.by_dev.contains_key(&dev) {
            return;
        }
        let limit = nix::unistd::pathconf(sample_path, nix::unistd::PathconfVar::LINK_MAX)
            .ok()
            .flatten()
            .map(|v| v as u64)
            .unwrap_or(DEFAULT_LINK_MAX);
        self.by_dev.insert(dev, limit);
    }

    #[cfg(not(unix))]
    pub fn probe(&mut self, dev: u64, _sample_path: &Path) {
        self.by_dev.entry(dev).or_insert(DEFAULT_LINK_MAX);
    }

    /// Overrides the cached limit for `dev` directly, bypassing `probe`.
    /// Exists so tests can exercise `LINK_MAX` exhaustion/promotion
    /// without needing a filesystem that actually enforces a small limit.
    pub fn set_for_test(&mut self, dev: u64, limit: u64) {
        self.by_dev.insert(dev, limit);
    }
}
