// Liveness Checker Port
// "File exists" is not enough: the candidate must actually start and exit 0

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Result of a liveness probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    /// Probe failed; reason is for logging only
    Dead(String),
}

impl Liveness {
    pub fn is_alive(&self) -> bool {
        matches!(self, Liveness::Alive)
    }
}

#[async_trait]
pub trait LivenessChecker: Send + Sync {
    /// Run `path` with a verification argument and report whether it exited 0
    /// within `timeout`. Must not fail past this boundary.
    async fn check(&self, path: &Path, timeout: Duration) -> Liveness;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    /// Mock LivenessChecker: only listed paths are alive
    pub struct MockLivenessChecker {
        alive: HashSet<PathBuf>,
        checked: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl MockLivenessChecker {
        pub fn new<I, P>(alive: I) -> Self
        where
            I: IntoIterator<Item = P>,
            P: Into<PathBuf>,
        {
            Self {
                alive: alive.into_iter().map(Into::into).collect(),
                checked: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Paths probed so far, in order
        pub fn checked(&self) -> Vec<PathBuf> {
            self.checked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LivenessChecker for MockLivenessChecker {
        async fn check(&self, path: &Path, _timeout: Duration) -> Liveness {
            self.checked.lock().unwrap().push(path.to_path_buf());
            if self.alive.contains(path) {
                Liveness::Alive
            } else {
                Liveness::Dead("mock: not alive".to_string())
            }
        }
    }
}
