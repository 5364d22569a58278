// Persisted user settings (single record)

use serde::{Deserialize, Serialize};

/// Default command name. Also the sentinel meaning "auto-discover".
pub const DEFAULT_COMMAND: &str = "claude";

/// User-editable settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantSettings {
    /// Executable override; the default sentinel (or empty) means auto-discover
    #[serde(default = "default_executable_path")]
    pub executable_path: String,
}

fn default_executable_path() -> String {
    DEFAULT_COMMAND.to_string()
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            executable_path: default_executable_path(),
        }
    }
}

impl AssistantSettings {
    /// Explicit override, if the user configured one
    pub fn override_path(&self) -> Option<&str> {
        explicit_override(&self.executable_path)
    }
}

/// `raw` as an explicit executable override, or `None` for the
/// auto-discover sentinels (empty or the default command name)
pub fn explicit_override(raw: &str) -> Option<&str> {
    let path = raw.trim();
    if path.is_empty() || path == DEFAULT_COMMAND {
        None
    } else {
        Some(path)
    }
}
