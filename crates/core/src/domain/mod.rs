// Domain Layer - Pure types describing executables, invocations and settings

pub mod executable;
pub mod invocation;
pub mod search_path;
pub mod settings;

// Re-exports
pub use executable::{Candidate, ExecutableCandidates, Resolution, ResolvedExecutable};
pub use invocation::{FailureKind, InvocationFailure, InvocationOutcome, InvocationSpec};
pub use search_path::{augment_search_path, PATH_VAR};
pub use settings::{explicit_override, AssistantSettings, DEFAULT_COMMAND};
