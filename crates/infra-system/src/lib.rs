// Noteask Infrastructure - System Adapters
// Implements: ProcessRunner, LivenessChecker, ExecutableLocator, SettingsStore

pub mod executable_locator;
pub mod liveness_probe;
pub mod locations;
pub mod settings_store;
pub mod subprocess_runner;
mod termination;

pub use executable_locator::SystemExecutableLocator;
pub use liveness_probe::SubprocessLivenessChecker;
pub use settings_store::JsonSettingsStore;
pub use subprocess_runner::SubprocessRunner;
