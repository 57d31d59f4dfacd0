//! Transient source locators handed to the playback primitive.
//!
//! Every track gets its own `SourceLocator`, minted from a shared
//! `LocatorRegistry`. The locator is the only thing the primitive needs to
//! find a track's bytes; the registry maps it back to a path. Dropping a
//! locator releases its registry entry, so the registry never outlives the
//! tracks that own its entries.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    entries: HashMap<u64, PathBuf>,
}

/// Shared table of live locators.
#[derive(Debug, Clone, Default)]
pub struct LocatorRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh locator for `path`. Minting the same path twice yields two
    /// distinct locators.
    pub fn mint(&self, path: &Path) -> SourceLocator {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.insert(id, path.to_path_buf());
        drop(inner);

        SourceLocator {
            id,
            registry: self.clone(),
        }
    }

    /// Resolve a locator back to the file it refers to.
    pub fn resolve(&self, locator: &SourceLocator) -> Option<PathBuf> {
        self.lock().entries.get(&locator.id).cloned()
    }

    /// Number of locators that have been minted and not yet released.
    #[cfg(test)]
    pub fn live(&self) -> usize {
        self.lock().entries.len()
    }

    fn release(&self, id: u64) {
        self.lock().entries.remove(&id);
    }

    // Entries are independent, so a poisoned table is still consistent.
    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Opaque reference to a track's bytes. Released on drop.
pub struct SourceLocator {
    id: u64,
    registry: LocatorRegistry,
}

impl SourceLocator {
    #[cfg(test)]
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl PartialEq for SourceLocator {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Arc::ptr_eq(&self.registry.inner, &other.registry.inner)
    }
}

impl Eq for SourceLocator {}

impl fmt::Debug for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceLocator({self})")
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cadence-src:{}", self.id)
    }
}

impl Drop for SourceLocator {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}
