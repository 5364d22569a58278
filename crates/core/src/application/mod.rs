// Application Layer - Use Cases

pub mod configuration;
pub mod constants;
pub mod executable_cache;
pub mod orchestrator;
pub mod path_resolver;

// Re-exports
pub use configuration::ConfigurationService;
pub use executable_cache::ExecutableCache;
pub use orchestrator::{compose_payload, OrchestratorConfig, RequestOrchestrator};
pub use path_resolver::PathResolver;
