// Executable discovery: first candidate that exists and passes liveness wins
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::{
    explicit_override, Candidate, ExecutableCandidates, Resolution, ResolvedExecutable,
};
use crate::port::{ExecutableLocator, LivenessChecker};

/// Resolves the assistant executable from an ordered candidate list
pub struct PathResolver {
    locator: Arc<dyn ExecutableLocator>,
    liveness: Arc<dyn LivenessChecker>,
    liveness_timeout: Duration,
}

impl PathResolver {
    /// Create a new resolver
    ///
    /// # Arguments
    /// * `locator` - OS command search + existence checks
    /// * `liveness` - Runs candidates with a verification argument
    /// * `liveness_timeout` - Bound for each liveness probe
    pub fn new(
        locator: Arc<dyn ExecutableLocator>,
        liveness: Arc<dyn LivenessChecker>,
        liveness_timeout: Duration,
    ) -> Self {
        Self {
            locator,
            liveness,
            liveness_timeout,
        }
    }

    /// Resolve an executable.
    ///
    /// An explicit `override_path` is trusted and returned without any check.
    /// Empty or the default command name count as no override. Otherwise
    /// candidates are tried strictly in order. `None` means nothing
    /// usable was found; callers disable the feature instead of failing.
    pub async fn resolve(
        &self,
        candidates: &ExecutableCandidates,
        override_path: Option<&str>,
    ) -> Option<ResolvedExecutable> {
        if let Some(raw) = override_path.and_then(explicit_override) {
            let path = self.locator.expand_user_path(raw);
            info!(path = %path.display(), "Using configured executable path");
            return Some(ResolvedExecutable::new(
                path,
                Resolution::ConfiguredOverride,
            ));
        }

        info!(candidates = candidates.len(), "Searching for executable");

        for (position, candidate) in candidates.iter().enumerate() {
            debug!(position, candidate = %candidate, "Checking candidate");

            let Some(path) = self.locate(candidate) else {
                continue;
            };

            let verdict = self.liveness.check(&path, self.liveness_timeout).await;
            if verdict.is_alive() {
                info!(path = %path.display(), position, "Executable resolved");
                return Some(ResolvedExecutable::new(
                    path,
                    Resolution::Discovered { position },
                ));
            }
            debug!(path = %path.display(), verdict = ?verdict, "Candidate failed liveness check");
        }

        warn!("No usable executable found among candidates");
        None
    }

    fn locate(&self, candidate: &Candidate) -> Option<PathBuf> {
        match candidate {
            Candidate::Command(name) => {
                let found = self.locator.lookup_command(name);
                if found.is_none() {
                    debug!(command = %name, "Command not found on search path");
                }
                found
            }
            Candidate::Path(path) => {
                if self.locator.exists(path) {
                    Some(path.clone())
                } else {
                    debug!(path = %path.display(), "Candidate path does not exist");
                    None
                }
            }
        }
    }
}
