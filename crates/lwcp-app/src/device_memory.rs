//! Last-used device name per platform

use std::sync::Arc;

use lwcp_core::prelude::*;

use crate::services::KeyValueStore;

/// Typed view over the key/value store.
///
/// Keys follow `last<PlatformName>Device`, e.g. `lastiOSDevice`.
#[derive(Clone)]
pub struct DeviceMemory {
    store: Arc<dyn KeyValueStore>,
}

impl DeviceMemory {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn key(platform_name: &str) -> String {
        format!("last{}Device", platform_name)
    }

    /// Remembered device, or `""` when none
    pub fn get(&self, platform_name: &str) -> String {
        self.store.get(&Self::key(platform_name)).unwrap_or_default()
    }

    pub fn set(&self, platform_name: &str, device: &str) -> Result<()> {
        self.store.set(&Self::key(platform_name), device)
    }
}

impl std::fmt::Debug for DeviceMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceMemory").finish_non_exhaustive()
    }
}
