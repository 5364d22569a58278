// Executable locator implementation
// reason: `which` crate mirrors the shell's PATH / PATHEXT lookup on every OS
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use noteask_core::port::ExecutableLocator;

/// Looks commands up on the process search path (or an explicit one)
#[derive(Default)]
pub struct SystemExecutableLocator {
    search_path: Option<OsString>,
}

impl SystemExecutableLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search `search_path` instead of the process's own PATH
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ExecutableLocator for SystemExecutableLocator {
    fn lookup_command(&self, command: &str) -> Option<PathBuf> {
        let found = match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
                which::which_in(command, Some(paths), cwd)
            }
            None => which::which(command),
        };

        match found {
            Ok(path) => {
                debug!(command = %command, path = %path.display(), "Command found");
                Some(path)
            }
            Err(e) => {
                debug!(command = %command, error = %e, "Command lookup failed");
                None
            }
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn expand_user_path(&self, raw: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(raw).into_owned())
    }
}
