// JSON settings file
// reason: `config` for tolerant loading (missing file = defaults), serde_json for writes
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use noteask_core::domain::AssistantSettings;
use noteask_core::port::SettingsStore;
use noteask_core::{AppError, Result};

/// Settings persisted as a single JSON object
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<AssistantSettings> {
        let source = config::File::from(self.path.as_path())
            .format(config::FileFormat::Json)
            .required(false);

        let settings = config::Config::builder()
            .add_source(source)
            .build()
            .and_then(|c| c.try_deserialize::<AssistantSettings>())
            .map_err(|e| {
                AppError::Config(format!("{}: {}", self.path.display(), e))
            })?;

        debug!(path = %self.path.display(), "Settings file read");
        Ok(settings)
    }

    fn save(&self, settings: &AssistantSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Write-then-rename so a crash never leaves a half-written file
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}
