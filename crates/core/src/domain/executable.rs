// Executable candidates and resolution results

use std::fmt;
use std::path::{Path, PathBuf};

/// One place to look for the executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Bare command name, resolved through the OS search path
    Command(String),
    /// Absolute or relative filesystem location
    Path(PathBuf),
}

impl Candidate {
    /// Classify a raw string: anything with a path separator is a path.
    pub fn parse(raw: &str) -> Self {
        if raw.contains('/') || raw.contains(std::path::MAIN_SEPARATOR) {
            Candidate::Path(PathBuf::from(raw))
        } else {
            Candidate::Command(raw.to_string())
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Candidate::Command(name) => write!(f, "{} (via search path)", name),
            Candidate::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Ordered, immutable list of candidates. Position is priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableCandidates(Vec<Candidate>);

impl ExecutableCandidates {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self(candidates)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExecutableCandidates {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| Candidate::parse(s.as_ref())).collect())
    }
}

/// How a resolved executable was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Explicit user configuration, trusted without validation
    ConfiguredOverride,
    /// Found by search; `position` is the index in the candidate list
    Discovered { position: usize },
}

/// Executable confirmed to exist and to pass the liveness check
/// (or explicitly configured by the user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExecutable {
    path: PathBuf,
    resolution: Resolution,
}

impl ResolvedExecutable {
    pub fn new(path: impl Into<PathBuf>, resolution: Resolution) -> Self {
        Self {
            path: path.into(),
            resolution,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }
}

impl fmt::Display for ResolvedExecutable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolution {
            Resolution::ConfiguredOverride => write!(f, "{} (configured)", self.path.display()),
            Resolution::Discovered { position } => write!(
                f,
                "{} (discovered, candidate #{})",
                self.path.display(),
                position + 1
            ),
        }
    }
}
