//! Memoizing template cache
//!
//! Templates are fetched at most once per resolved URL while a fetch is in
//! flight or after it succeeded. Callers polling from the frame loop get a
//! [`TemplateState`] back immediately; async callers can [`TemplateCache::load`]
//! and share the in-flight fetch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::runtime::Handle;

use super::source::TemplateSource;
use super::template::PoseTemplate;
use super::url::resolve_template_url;
use crate::error::{InteractionError, Result};

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<PoseTemplate>>>>;

enum Entry {
    Pending { id: u64, fetch: SharedFetch },
    Ready(Arc<PoseTemplate>),
}

/// What the cache can hand out right now for a template path
#[derive(Debug, Clone)]
pub enum TemplateState {
    Ready(Arc<PoseTemplate>),
    /// A fetch is in flight; ask again on a later frame
    Pending,
    /// The cache was shut down and will not fetch anything
    Missing,
}

impl TemplateState {
    pub fn ready(&self) -> Option<&Arc<PoseTemplate>> {
        match self {
            TemplateState::Ready(template) => Some(template),
            _ => None,
        }
    }
}

/// Non-blocking template lookups, as used by the pose matcher
pub trait TemplateLookup {
    fn get_template(&self, path: &str) -> TemplateState;
}

pub struct TemplateCache {
    base_url: String,
    source: Arc<dyn TemplateSource>,
    runtime: Handle,
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    destroyed: Arc<AtomicBool>,
    next_fetch_id: AtomicU64,
}

impl TemplateCache {
    /// Create a cache resolving paths against `base_url`. Background fetches
    /// run on `runtime`.
    pub fn new(base_url: impl Into<String>, source: Arc<dyn TemplateSource>, runtime: Handle) -> Self {
        Self {
            base_url: base_url.into(),
            source,
            runtime,
            entries: Arc::new(Mutex::new(HashMap::new())),
            destroyed: Arc::new(AtomicBool::new(false)),
            next_fetch_id: AtomicU64::new(0),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resolve(&self, path: &str) -> String {
        resolve_template_url(&self.base_url, path)
    }

    /// Non-blocking lookup. Starts a background fetch on a miss.
    pub fn get_template(&self, path: &str) -> TemplateState {
        if self.is_shut_down() {
            return TemplateState::Missing;
        }
        let url = self.resolve(path);

        let fetch = {
            let mut entries = lock(&self.entries);
            match entries.get(&url) {
                Some(Entry::Ready(template)) => return TemplateState::Ready(Arc::clone(template)),
                Some(Entry::Pending { .. }) => return TemplateState::Pending,
                None => self.begin_fetch(&mut entries, url),
            }
        };

        self.runtime.spawn(async move {
            let _ = fetch.await;
        });
        TemplateState::Pending
    }

    /// Resolve a template, joining any fetch already in flight for it
    pub async fn load(&self, path: &str) -> Result<Arc<PoseTemplate>> {
        if self.is_shut_down() {
            return Err(InteractionError::CacheShutdown);
        }
        let url = self.resolve(path);

        let fetch = {
            let mut entries = lock(&self.entries);
            match entries.get(&url) {
                Some(Entry::Ready(template)) => return Ok(Arc::clone(template)),
                Some(Entry::Pending { fetch, .. }) => fetch.clone(),
                None => self.begin_fetch(&mut entries, url),
            }
        };
        fetch.await
    }

    /// Drop one cached or pending template so the next lookup refetches it
    pub fn evict(&self, path: &str) -> bool {
        let url = self.resolve(path);
        lock(&self.entries).remove(&url).is_some()
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    /// Stop serving templates. Fetches still in flight finish without
    /// touching cache state.
    pub fn shutdown(&self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            tracing::debug!(base_url = %self.base_url, "Template cache shut down");
        }
        self.clear();
    }

    pub fn is_shut_down(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    /// Templates cached or in flight
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_ready(&self, path: &str) -> bool {
        let url = self.resolve(path);
        matches!(lock(&self.entries).get(&url), Some(Entry::Ready(_)))
    }

    fn begin_fetch(&self, entries: &mut HashMap<String, Entry>, url: String) -> SharedFetch {
        let id = self.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        let source = Arc::clone(&self.source);
        let shared_entries = Arc::clone(&self.entries);
        let destroyed = Arc::clone(&self.destroyed);
        let key = url.clone();

        tracing::debug!(url = %url, "Fetching pose template");
        let fetch = async move {
            let result = match source.fetch(&url).await {
                Ok(bytes) => PoseTemplate::from_bytes(&bytes).map(Arc::new),
                Err(e) => Err(e),
            };
            if destroyed.load(Ordering::Acquire) {
                return result;
            }

            if let Err(e) = &result {
                tracing::error!(url = %url, error = %e, "Failed to load pose template");
            }

            let mut entries = lock(&shared_entries);
            let current = matches!(entries.get(&url), Some(Entry::Pending { id: pending, .. }) if *pending == id);
            if current {
                match &result {
                    Ok(template) => {
                        entries.insert(url, Entry::Ready(Arc::clone(template)));
                    }
                    Err(_) => {
                        entries.remove(&url);
                    }
                }
            }
            result
        }
        .boxed()
        .shared();

        entries.insert(key, Entry::Pending { id, fetch: fetch.clone() });
        fetch
    }
}

impl TemplateLookup for TemplateCache {
    fn get_template(&self, path: &str) -> TemplateState {
        TemplateCache::get_template(self, path)
    }
}

impl<L: TemplateLookup + ?Sized> TemplateLookup for Arc<L> {
    fn get_template(&self, path: &str) -> TemplateState {
        (**self).get_template(path)
    }
}

impl Drop for TemplateCache {
    fn drop(&mut self) {
        self.destroyed.store(true, Ordering::Release);
    }
}

fn lock(entries: &Mutex<HashMap<String, Entry>>) -> MutexGuard<'_, HashMap<String, Entry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}
