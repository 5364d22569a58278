// Settings Store Port
// Loads and rewrites the single settings record

use crate::domain::AssistantSettings;
use crate::error::Result;

pub trait SettingsStore: Send + Sync {
    /// Load settings; a missing record yields defaults
    fn load(&self) -> Result<AssistantSettings>;

    /// Replace the persisted record
    fn save(&self, settings: &AssistantSettings) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// In-memory settings store
    #[derive(Default)]
    pub struct MemorySettingsStore {
        record: Mutex<Option<AssistantSettings>>,
    }

    impl MemorySettingsStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl SettingsStore for MemorySettingsStore {
        fn load(&self) -> Result<AssistantSettings> {
            Ok(self.record.lock().unwrap().clone().unwrap_or_default())
        }

        fn save(&self, settings: &AssistantSettings) -> Result<()> {
            *self.record.lock().unwrap() = Some(settings.clone());
            Ok(())
        }
    }
}
