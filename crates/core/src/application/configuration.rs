// Settings changes flow into the executable cache
use std::sync::Arc;
use tracing::info;

use super::executable_cache::ExecutableCache;
use crate::domain::{AssistantSettings, ResolvedExecutable};
use crate::error::Result;
use crate::port::SettingsStore;

/// Loads / updates the settings record and keeps the cache in sync
pub struct ConfigurationService {
    store: Arc<dyn SettingsStore>,
    executables: Arc<ExecutableCache>,
}

impl ConfigurationService {
    pub fn new(store: Arc<dyn SettingsStore>, executables: Arc<ExecutableCache>) -> Self {
        Self { store, executables }
    }

    /// Load persisted settings and apply the override to the cache
    pub async fn initialize(&self) -> Result<AssistantSettings> {
        let settings = self.store.load()?;
        self.executables
            .set_override(settings.override_path().map(str::to_string))
            .await;
        info!(executable_path = %settings.executable_path, "Settings loaded");
        Ok(settings)
    }

    /// Current persisted settings
    pub fn settings(&self) -> Result<AssistantSettings> {
        self.store.load()
    }

    /// Persist a new executable path and re-resolve immediately.
    ///
    /// Passing the default command name (or an empty string) switches back to
    /// auto-discovery.
    pub async fn set_executable_path(&self, path: &str) -> Result<Option<ResolvedExecutable>> {
        let mut settings = self.store.load()?;
        settings.executable_path = path.trim().to_string();
        self.store.save(&settings)?;
        info!(executable_path = %settings.executable_path, "Executable path updated");

        self.executables
            .set_override(settings.override_path().map(str::to_string))
            .await;
        Ok(self.executables.refresh().await)
    }
}
