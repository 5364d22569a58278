// Executable Locator Port
// OS command search (`which` / `where`) and filesystem existence checks

use std::path::{Path, PathBuf};

pub trait ExecutableLocator: Send + Sync {
    /// Resolve a bare command name through the OS search path
    fn lookup_command(&self, command: &str) -> Option<PathBuf>;

    /// Whether a filesystem entry exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Turn a user-typed path (e.g. `~/bin/claude`) into a usable one
    fn expand_user_path(&self, raw: &str) -> PathBuf;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, HashSet};

    /// Mock locator backed by in-memory tables
    #[derive(Default)]
    pub struct MockExecutableLocator {
        commands: HashMap<String, PathBuf>,
        files: HashSet<PathBuf>,
    }

    impl MockExecutableLocator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_command(mut self, name: &str, path: impl Into<PathBuf>) -> Self {
            self.commands.insert(name.to_string(), path.into());
            self
        }

        pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
            self.files.insert(path.into());
            self
        }
    }

    impl ExecutableLocator for MockExecutableLocator {
        fn lookup_command(&self, command: &str) -> Option<PathBuf> {
            self.commands.get(command).cloned()
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.contains(path)
        }

        fn expand_user_path(&self, raw: &str) -> PathBuf {
            PathBuf::from(raw)
        }
    }
}
