use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::assets::decode::ArtImage;
use crate::foundation::error::CardSkinResult;

/// Outcome of [`ArtTextureCache::request`].
#[derive(Clone, Debug)]
pub enum ArtRequest {
    /// Already decoded; use it now.
    Ready(Arc<ArtImage>),
    /// A load is in flight; the waiter will be notified on completion.
    Pending,
    /// First request for this URL: the caller must start exactly one load.
    StartLoad,
    /// A previous load failed; the URL is not retried.
    Failed,
}

/// Waiters drained by [`ArtTextureCache::complete`].
#[derive(Clone, Debug)]
pub struct ArtCompletion<W> {
    /// Shared image, `None` when the load failed or was not expected.
    pub image: Option<Arc<ArtImage>>,
    pub waiters: SmallVec<[W; 4]>,
}

#[derive(Debug)]
struct ArtEntry<W> {
    image: Option<Arc<ArtImage>>,
    waiters: SmallVec<[W; 4]>,
    loading: bool,
    failed: bool,
}

impl<W> ArtEntry<W> {
    fn loading() -> Self {
        Self {
            image: None,
            waiters: SmallVec::new(),
            loading: true,
            failed: false,
        }
    }
}

/// URL-keyed artwork cache with one in-flight load per URL and multi-waiter notification.
///
/// The cache never performs IO; it tells the caller when a load must start and is fed results
/// through [`ArtTextureCache::complete`].
#[derive(Debug)]
pub struct ArtTextureCache<W> {
    entries: HashMap<String, ArtEntry<W>>,
    loads_started: u64,
}

impl<W> Default for ArtTextureCache<W> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            loads_started: 0,
        }
    }
}

impl<W: Copy + Eq> ArtTextureCache<W> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `url` for `waiter`. See [`ArtRequest`].
    pub fn request(&mut self, url: &str, waiter: W) -> ArtRequest {
        match self.entries.get_mut(url) {
            Some(entry) => {
                if let Some(img) = &entry.image {
                    return ArtRequest::Ready(img.clone());
                }
                if entry.failed {
                    return ArtRequest::Failed;
                }
                if !entry.waiters.contains(&waiter) {
                    entry.waiters.push(waiter);
                }
                ArtRequest::Pending
            }
            None => {
                let mut entry = ArtEntry::loading();
                entry.waiters.push(waiter);
                self.entries.insert(url.to_string(), entry);
                self.loads_started = self.loads_started.saturating_add(1);
                ArtRequest::StartLoad
            }
        }
    }

    /// Remove `waiter` from `url`'s waiter list. The load itself keeps running.
    pub fn unlisten(&mut self, url: &str, waiter: W) -> bool {
        let Some(entry) = self.entries.get_mut(url) else {
            return false;
        };
        let before = entry.waiters.len();
        entry.waiters.retain(|w| *w != waiter);
        entry.waiters.len() != before
    }

    /// Record the result of the load for `url` and drain its waiters.
    ///
    /// Results for URLs that are not loading (never requested, purged, already settled) are
    /// dropped and notify nobody.
    pub fn complete(&mut self, url: &str, result: CardSkinResult<ArtImage>) -> ArtCompletion<W> {
        let Some(entry) = self.entries.get_mut(url).filter(|e| e.loading) else {
            return ArtCompletion {
                image: None,
                waiters: SmallVec::new(),
            };
        };

        entry.loading = false;
        match result {
            Ok(img) => entry.image = Some(Arc::new(img)),
            Err(err) => {
                tracing::warn!(url, error = %err, "artwork load failed; keeping placeholder");
                entry.failed = true;
            }
        }

        ArtCompletion {
            image: entry.image.clone(),
            waiters: std::mem::take(&mut entry.waiters),
        }
    }

    pub fn get(&self, url: &str) -> Option<Arc<ArtImage>> {
        self.entries.get(url).and_then(|e| e.image.clone())
    }

    pub fn is_loading(&self, url: &str) -> bool {
        self.entries.get(url).is_some_and(|e| e.loading)
    }

    pub fn has_failed(&self, url: &str) -> bool {
        self.entries.get(url).is_some_and(|e| e.failed)
    }

    pub fn waiter_count(&self, url: &str) -> usize {
        self.entries.get(url).map_or(0, |e| e.waiters.len())
    }

    /// Forget a settled entry so the next request loads again. In-flight entries are kept.
    pub fn purge(&mut self, url: &str) -> bool {
        if self.is_loading(url) {
            return false;
        }
        self.entries.remove(url).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Total loads handed out as [`ArtRequest::StartLoad`].
    pub fn loads_started(&self) -> u64 {
        self.loads_started
    }

    pub fn in_flight(&self) -> usize {
        self.entries.values().filter(|e| e.loading).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/art_cache.rs"]
mod tests;
