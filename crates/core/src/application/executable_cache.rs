// Resolved-executable cache with explicit refresh / invalidation
use tokio::sync::RwLock;
use tracing::info;

use super::path_resolver::PathResolver;
use crate::domain::{ExecutableCandidates, ResolvedExecutable};

#[derive(Debug, Clone)]
enum CacheState {
    Unresolved,
    Resolved(ResolvedExecutable),
    Missing,
}

/// Holds the executable for the session. Resolution runs lazily on first use
/// and again only after `invalidate` / `set_override` / `refresh`.
pub struct ExecutableCache {
    resolver: PathResolver,
    candidates: ExecutableCandidates,
    override_path: RwLock<Option<String>>,
    state: RwLock<CacheState>,
}

impl ExecutableCache {
    pub fn new(
        resolver: PathResolver,
        candidates: ExecutableCandidates,
        override_path: Option<String>,
    ) -> Self {
        Self {
            resolver,
            candidates,
            override_path: RwLock::new(override_path),
            state: RwLock::new(CacheState::Unresolved),
        }
    }

    /// Cached executable, resolving it first if needed
    pub async fn current(&self) -> Option<ResolvedExecutable> {
        {
            let state = self.state.read().await;
            match &*state {
                CacheState::Resolved(resolved) => return Some(resolved.clone()),
                CacheState::Missing => return None,
                CacheState::Unresolved => {}
            }
        }

        let mut state = self.state.write().await;
        // Another caller may have resolved while we waited for the write lock
        if let CacheState::Unresolved = &*state {
            *state = self.resolve_state().await;
        }
        match &*state {
            CacheState::Resolved(resolved) => Some(resolved.clone()),
            _ => None,
        }
    }

    /// Drop the cached value and resolve again now
    pub async fn refresh(&self) -> Option<ResolvedExecutable> {
        let mut state = self.state.write().await;
        *state = self.resolve_state().await;
        match &*state {
            CacheState::Resolved(resolved) => Some(resolved.clone()),
            _ => None,
        }
    }

    /// Forget the cached value; the next `current` resolves again
    pub async fn invalidate(&self) {
        *self.state.write().await = CacheState::Unresolved;
        info!("Executable cache invalidated");
    }

    /// Replace the configured override (None = auto-discover) and invalidate
    pub async fn set_override(&self, override_path: Option<String>) {
        *self.override_path.write().await = override_path;
        self.invalidate().await;
    }

    async fn resolve_state(&self) -> CacheState {
        let override_path = self.override_path.read().await.clone();
        match self
            .resolver
            .resolve(&self.candidates, override_path.as_deref())
            .await
        {
            Some(resolved) => CacheState::Resolved(resolved),
            None => CacheState::Missing,
        }
    }
}
