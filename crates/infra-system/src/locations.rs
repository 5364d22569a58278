// Platform install locations, derived from OS conventions and the current
// user's home directory. Nothing here names a particular machine or user.
use directories::{BaseDirs, ProjectDirs};
use std::path::{Path, PathBuf};

use noteask_core::domain::{Candidate, ExecutableCandidates};

const APPLICATION: &str = "noteask";
const SETTINGS_FILE: &str = "settings.json";

/// Home directory of the current user
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Default settings file, e.g. `~/.config/noteask/settings.json` on Linux
pub fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", APPLICATION).map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

/// Default directory for the debug log file
pub fn log_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", APPLICATION).map(|dirs| dirs.data_local_dir().join("logs"))
}

/// Where the assistant executable usually lives, highest priority first.
/// The bare command (search-path lookup) always comes first.
pub fn standard_candidates(command: &str, home: Option<&Path>) -> ExecutableCandidates {
    let mut candidates = vec![Candidate::Command(command.to_string())];

    #[cfg(unix)]
    {
        candidates.push(Candidate::Path(Path::new("/usr/local/bin").join(command)));
        candidates.push(Candidate::Path(Path::new("/opt/homebrew/bin").join(command)));
        if let Some(home) = home {
            candidates.push(Candidate::Path(home.join(".claude/local").join(command)));
            candidates.push(Candidate::Path(
                home.join(".claude/local/node_modules/.bin").join(command),
            ));
            candidates.push(Candidate::Path(home.join(".config/claude").join(command)));
            candidates.push(Candidate::Path(home.join(".local/bin").join(command)));
        }
    }

    #[cfg(windows)]
    {
        if let Some(home) = home {
            candidates.push(Candidate::Path(
                home.join(".claude\\local").join(format!("{}.exe", command)),
            ));
            candidates.push(Candidate::Path(
                home.join("AppData\\Roaming\\npm").join(format!("{}.cmd", command)),
            ));
            candidates.push(Candidate::Path(
                home.join(".local\\bin").join(format!("{}.exe", command)),
            ));
        }
    }

    ExecutableCandidates::new(candidates)
}

/// Directories prepended to the child's search path so the assistant can find
/// its own runtime even when this process was started with a minimal PATH
pub fn standard_search_dirs(home: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    #[cfg(unix)]
    {
        dirs.push(PathBuf::from("/opt/homebrew/bin"));
        dirs.push(PathBuf::from("/usr/local/bin"));
        if let Some(home) = home {
            dirs.push(home.join(".local/bin"));
        }
    }

    #[cfg(windows)]
    {
        if let Some(home) = home {
            dirs.push(home.join("AppData\\Roaming\\npm"));
        }
    }

    dirs
}
