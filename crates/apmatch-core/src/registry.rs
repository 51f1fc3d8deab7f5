//! Kernel registry.
//!
//! The registry manages the metadata of all registered kernels and provides
//! lookup functionality. Domain crates register their kernels at startup via
//! their `register_all` entry points.

use crate::domain::Domain;
use crate::error::{KernelError, Result};
use crate::kernel::KernelMetadata;
use hashbrown::HashMap;
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// Registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Total number of registered kernels.
    pub total: usize,
    /// Kernels by domain.
    pub by_domain: HashMap<Domain, usize>,
}

/// Central registry for kernel metadata.
#[derive(Debug)]
pub struct KernelRegistry {
    /// Kernel metadata by ID.
    kernels: RwLock<HashMap<String, KernelMetadata>>,
}

impl KernelRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kernels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a kernel's metadata.
    ///
    /// # Errors
    ///
    /// Returns `KernelAlreadyRegistered` if a kernel with the same ID exists.
    pub fn register_metadata(&self, metadata: KernelMetadata) -> Result<()> {
        let id = metadata.id.clone();
        let mut kernels = self.kernels.write().unwrap();

        if kernels.contains_key(&id) {
            return Err(KernelError::KernelAlreadyRegistered(id));
        }

        debug!(kernel_id = %id, domain = %metadata.domain, "Registering kernel");
        kernels.insert(id, metadata);
        Ok(())
    }

    /// Get a kernel's metadata by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<KernelMetadata> {
        let kernels = self.kernels.read().unwrap();
        kernels.get(id).cloned()
    }

    /// Check if a kernel exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        let kernels = self.kernels.read().unwrap();
        kernels.contains_key(id)
    }

    /// Get all kernel IDs.
    #[must_use]
    pub fn kernel_ids(&self) -> Vec<String> {
        let kernels = self.kernels.read().unwrap();
        kernels.keys().cloned().collect()
    }

    /// Get kernels by domain.
    #[must_use]
    pub fn by_domain(&self, domain: Domain) -> Vec<KernelMetadata> {
        let kernels = self.kernels.read().unwrap();
        kernels
            .values()
            .filter(|m| m.domain == domain)
            .cloned()
            .collect()
    }

    /// Get registry statistics.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        let kernels = self.kernels.read().unwrap();

        let mut by_domain: HashMap<Domain, usize> = HashMap::new();
        for metadata in kernels.values() {
            *by_domain.entry(metadata.domain).or_default() += 1;
        }

        RegistryStats {
            total: kernels.len(),
            by_domain,
        }
    }

    /// Total number of registered kernels.
    #[must_use]
    pub fn total_count(&self) -> usize {
        let kernels = self.kernels.read().unwrap();
        kernels.len()
    }

    /// Clear all registered kernels.
    pub fn clear(&self) {
        let mut kernels = self.kernels.write().unwrap();
        kernels.clear();
        info!("Cleared kernel registry");
    }

    /// Unregister a kernel by ID.
    pub fn unregister(&self, id: &str) -> bool {
        let mut kernels = self.kernels.write().unwrap();
        if kernels.remove(id).is_some() {
            debug!(kernel_id = %id, "Unregistered kernel");
            return true;
        }

        warn!(kernel_id = %id, "Attempted to unregister non-existent kernel");
        false
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global kernel registry.
///
/// Shared process-wide catalog for callers that do not manage their own
/// registry instance.
static GLOBAL_REGISTRY: std::sync::OnceLock<KernelRegistry> = std::sync::OnceLock::new();

/// Get or initialize the global registry.
pub fn global_registry() -> &'static KernelRegistry {
    GLOBAL_REGISTRY.get_or_init(KernelRegistry::new)
}
