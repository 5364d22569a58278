// Port Layer - Interfaces for external dependencies

pub mod executable_locator;
pub mod liveness_checker;
pub mod process_runner;
pub mod settings_store;
pub mod time_provider;

// Re-exports
pub use executable_locator::ExecutableLocator;
pub use liveness_checker::{Liveness, LivenessChecker};
pub use process_runner::ProcessRunner;
pub use settings_store::SettingsStore;
pub use time_provider::TimeProvider;
