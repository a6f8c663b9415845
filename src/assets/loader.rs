use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    fmt,
    rc::{Rc, Weak},
};

use futures::{
    channel::oneshot,
    future::{self, FutureExt as _, LocalBoxFuture, Shared},
    task::{LocalSpawn, LocalSpawnExt as _},
};

use crate::{
    assets::{
        cache::ResourceCache,
        media::MediaSource,
        priority::Priority,
        queue::{LoadQueue, QueuedRequest},
    },
    foundation::{
        config::LoaderConfig,
        error::{LoadError, PreloadError},
    },
    gallery::model::Group,
};

/// What a preload settles to: `Ok(Some(src))` when loaded, `Ok(None)` when the resource is
/// unavailable (or there was nothing to load), `Err` when the request will never be served.
pub type PreloadOutcome = Result<Option<String>, PreloadError>;

/// Handle to a preload. Concurrent callers for the same key get clones of one handle.
pub type Preload = Shared<LocalBoxFuture<'static, PreloadOutcome>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Which media primitive serves a request.
pub enum AssetKind {
    /// Still image.
    Image,
    /// Background audio track.
    Audio,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Audio => "audio",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Observable state of a resource key.
pub enum AssetState {
    /// In the cache.
    Loaded,
    /// Queued or in flight.
    Loading,
    /// Neither.
    Unloaded,
}

impl AssetState {
    /// Lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Loading => "loading",
            Self::Unloaded => "unloaded",
        }
    }
}

impl fmt::Display for AssetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Point-in-time counters.
pub struct LoaderStats {
    /// Keys in the cache.
    pub cached: usize,
    /// Keys queued or in flight.
    pub pending: usize,
    /// Requests waiting for admission.
    pub queued: usize,
    /// Loads in flight.
    pub active: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Per-key result of a group preload. Group preloads never fail.
pub struct GroupPreload {
    /// Keys now in the cache.
    pub loaded: Vec<String>,
    /// Keys whose load failed.
    pub unavailable: Vec<String>,
    /// Keys whose request was cancelled while queued.
    pub cancelled: Vec<String>,
}

impl GroupPreload {
    /// Append another report.
    pub fn extend(&mut self, other: GroupPreload) {
        self.loaded.extend(other.loaded);
        self.unavailable.extend(other.unavailable);
        self.cancelled.extend(other.cancelled);
    }

    /// `true` when every requested key loaded.
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty() && self.cancelled.is_empty()
    }
}

type StartLoad = Box<dyn FnOnce() -> LocalBoxFuture<'static, Option<String>>>;

struct QueuedLoad {
    key: String,
    kind: AssetKind,
    priority: Priority,
    start: StartLoad,
    settle: oneshot::Sender<PreloadOutcome>,
}

impl QueuedRequest for QueuedLoad {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> AssetKind {
        self.kind
    }

    fn priority(&self) -> Priority {
        self.priority
    }
}

/// Owned copy of a queued request, handed to cancellation predicates.
struct RequestView {
    key: String,
    kind: AssetKind,
    priority: Priority,
}

impl RequestView {
    fn of(item: &QueuedLoad) -> Self {
        Self {
            key: item.key.clone(),
            kind: item.kind,
            priority: item.priority,
        }
    }
}

impl QueuedRequest for RequestView {
    fn key(&self) -> &str {
        &self.key
    }

    fn kind(&self) -> AssetKind {
        self.kind
    }

    fn priority(&self) -> Priority {
        self.priority
    }
}

struct LoaderState {
    cache: ResourceCache,
    pending: HashMap<String, Preload>,
    queue: LoadQueue<QueuedLoad>,
}

struct LoaderCore {
    config: LoaderConfig,
    state: RefCell<LoaderState>,
    media: Rc<dyn MediaSource>,
    spawner: Box<dyn LocalSpawn>,
}

impl LoaderCore {
    /// Bookkeeping once the media primitive has answered.
    fn record_result(&self, src: String, result: Result<(), LoadError>) -> Option<String> {
        let mut state = self.state.borrow_mut();
        state.pending.remove(&src);
        match result {
            Ok(()) => {
                state.cache.put(src.clone());
                Some(src)
            }
            Err(err) => {
                tracing::warn!(src = %src, error = %err, "preload failed");
                None
            }
        }
    }
}

/// Admit queued requests while slots are free.
fn pump(core: &Rc<LoaderCore>) {
    loop {
        let admitted = core.state.borrow_mut().queue.admit();
        let Some(item) = admitted else {
            break;
        };
        let QueuedLoad {
            key,
            kind,
            priority,
            start,
            settle,
        } = item;
        tracing::debug!(src = %key, %kind, %priority, "admitting load");

        let weak = Rc::downgrade(core);
        let task = async move {
            let outcome = start().await;
            if let Some(core) = weak.upgrade() {
                core.state.borrow_mut().queue.release();
            }
            let _ = settle.send(Ok(outcome));
            if let Some(core) = weak.upgrade() {
                pump(&core);
            }
        };

        if let Err(err) = core.spawner.spawn_local(task) {
            // the dropped task drops `start` unrun and `settle` unsent: waiters observe `Shutdown`
            tracing::error!(src = %key, error = %err, "could not spawn load task");
            let mut state = core.state.borrow_mut();
            state.queue.release();
            state.pending.remove(&key);
        }
    }
}

/// Bounded-concurrency, priority-ordered, deduplicating preloader with an LRU completion cache.
///
/// All state is single-threaded. Loads run as tasks on the [`LocalSpawn`] given at
/// construction, so an admitted load finishes (and fills the cache) even when every caller
/// has dropped its [`Preload`]. Cloning yields another handle to the same loader.
#[derive(Clone)]
pub struct AssetLoader {
    core: Rc<LoaderCore>,
}

impl fmt::Debug for AssetLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetLoader")
            .field("config", &self.core.config)
            .field("slots", &self.core.state.borrow().queue.limit())
            .field("stats", &self.stats())
            .finish()
    }
}

impl AssetLoader {
    /// Build a loader over `media`, spawning load tasks onto `spawner`.
    pub fn new(
        config: LoaderConfig,
        media: impl MediaSource + 'static,
        spawner: impl LocalSpawn + 'static,
    ) -> Self {
        let config = config.normalized();
        let state = LoaderState {
            cache: ResourceCache::new(config.max_cache_size),
            pending: HashMap::new(),
            queue: LoadQueue::new(config.concurrency_limit),
        };
        Self {
            core: Rc::new(LoaderCore {
                config,
                state: RefCell::new(state),
                media: Rc::new(media),
                spawner: Box::new(spawner),
            }),
        }
    }

    /// Effective configuration (after zero values were replaced by defaults).
    pub fn config(&self) -> LoaderConfig {
        self.core.config
    }

    /// Preload an image.
    pub fn preload_image(&self, src: &str, priority: Priority) -> Preload {
        self.preload(AssetKind::Image, src, priority)
    }

    /// Preload an audio track.
    pub fn preload_audio(&self, src: &str, priority: Priority) -> Preload {
        self.preload(AssetKind::Audio, src, priority)
    }

    /// Preload `src` through the primitive for `kind`.
    ///
    /// Empty keys and cache hits resolve immediately (a hit refreshes LRU order). A key
    /// that is already queued or in flight returns the existing handle, whatever `priority`
    /// is asked for. Otherwise the request is queued and admitted when a slot frees up.
    pub fn preload(&self, kind: AssetKind, src: &str, priority: Priority) -> Preload {
        if src.is_empty() {
            return ready(Ok(None));
        }

        {
            let mut state = self.core.state.borrow_mut();
            if state.cache.get(src).is_some() {
                tracing::trace!(src, "cache hit");
                return ready(Ok(Some(src.to_string())));
            }
            if let Some(existing) = state.pending.get(src) {
                tracing::debug!(src, "joining pending request");
                return existing.clone();
            }
        }

        let (settle, rx) = oneshot::channel();
        let key = src.to_string();
        let handle: Preload = rx
            .map(move |r| r.unwrap_or(Err(PreloadError::Shutdown { src: key })))
            .boxed_local()
            .shared();

        {
            let mut state = self.core.state.borrow_mut();
            state.pending.insert(src.to_string(), handle.clone());
            state.queue.push(QueuedLoad {
                key: src.to_string(),
                kind,
                priority,
                start: self.start_load(kind, src),
                settle,
            });
        }
        pump(&self.core);

        handle
    }

    fn start_load(&self, kind: AssetKind, src: &str) -> StartLoad {
        let media = Rc::clone(&self.core.media);
        let weak: Weak<LoaderCore> = Rc::downgrade(&self.core);
        let src = src.to_string();
        Box::new(move || {
            let load = match kind {
                AssetKind::Image => media.load_image(&src),
                AssetKind::Audio => media.load_audio(&src),
            };
            async move {
                let result = load.await;
                match weak.upgrade() {
                    Some(core) => core.record_result(src, result),
                    None => result.ok().map(|()| src),
                }
            }
            .boxed_local()
        })
    }

    /// Preload the group's critical set: its audio track and first image.
    #[tracing::instrument(skip_all, fields(priority = %priority))]
    pub fn preload_group_critical<'g>(
        &self,
        group: impl Into<Option<&'g Group>>,
        priority: Priority,
    ) -> LocalBoxFuture<'static, GroupPreload> {
        let Some(group) = group.into() else {
            return future::ready(GroupPreload::default()).boxed_local();
        };

        let mut requests = Vec::new();
        if let Some(audio) = group.audio_src.as_deref().filter(|s| !s.is_empty()) {
            requests.push((audio.to_string(), self.preload_audio(audio, priority)));
        }
        if let Some(first) = group.images.first().filter(|img| !img.src.is_empty()) {
            requests.push((first.src.clone(), self.preload_image(&first.src, priority)));
        }
        join_group(requests)
    }

    /// Preload every image of the group except the first.
    #[tracing::instrument(skip_all, fields(priority = %priority))]
    pub fn preload_group_background<'g>(
        &self,
        group: impl Into<Option<&'g Group>>,
        priority: Priority,
    ) -> LocalBoxFuture<'static, GroupPreload> {
        let Some(group) = group.into() else {
            return future::ready(GroupPreload::default()).boxed_local();
        };

        let requests = group
            .images
            .iter()
            .skip(1)
            .filter(|img| !img.src.is_empty())
            .map(|img| (img.src.clone(), self.preload_image(&img.src, priority)))
            .collect();
        join_group(requests)
    }

    /// Critical set first, then the rest of the group once the critical set has settled.
    pub fn preload_group<'g>(
        &self,
        group: impl Into<Option<&'g Group>>,
        priority: Priority,
    ) -> LocalBoxFuture<'static, GroupPreload> {
        let Some(group) = group.into() else {
            return future::ready(GroupPreload::default()).boxed_local();
        };

        let critical = self.preload_group_critical(group, priority);
        let loader = self.clone();
        let group = group.clone();
        async move {
            let mut report = critical.await;
            report.extend(loader.preload_group_background(&group, priority).await);
            report
        }
        .boxed_local()
    }

    /// `Loaded` if cached, `Loading` if queued or in flight, else `Unloaded`.
    ///
    /// Does not refresh LRU order.
    pub fn get_state(&self, src: &str) -> AssetState {
        let state = self.core.state.borrow();
        if state.cache.contains(src) {
            AssetState::Loaded
        } else if state.pending.contains_key(src) {
            AssetState::Loading
        } else {
            AssetState::Unloaded
        }
    }

    /// Drop every still-queued request matching `pred`; their handles reject with
    /// [`PreloadError::Cancelled`]. In-flight loads are untouched. Returns how many were cancelled.
    ///
    /// The predicate runs on a snapshot of the queue with no loader state borrowed, so it may
    /// query the loader (or even enqueue) while deciding.
    pub fn cancel_pending(&self, mut pred: impl FnMut(&dyn QueuedRequest) -> bool) -> usize {
        let snapshot: Vec<RequestView> = self
            .core
            .state
            .borrow()
            .queue
            .iter()
            .map(RequestView::of)
            .collect();
        let doomed: HashSet<String> = snapshot
            .into_iter()
            .filter(|view| pred(view))
            .map(|view| view.key)
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        let removed = {
            let mut state = self.core.state.borrow_mut();
            let removed = state
                .queue
                .cancel_where(|item: &QueuedLoad| doomed.contains(&item.key));
            for item in &removed {
                state.pending.remove(&item.key);
            }
            removed
        };

        let count = removed.len();
        for item in removed {
            tracing::debug!(src = %item.key, priority = %item.priority, "cancelled queued load");
            let _ = item.settle.send(Err(PreloadError::Cancelled { src: item.key }));
        }
        count
    }

    /// Current counters.
    pub fn stats(&self) -> LoaderStats {
        let state = self.core.state.borrow();
        LoaderStats {
            cached: state.cache.len(),
            pending: state.pending.len(),
            queued: state.queue.len(),
            active: state.queue.active(),
        }
    }

    /// Keys waiting for admission, in admission order.
    pub fn queued_keys(&self) -> Vec<String> {
        self.core
            .state
            .borrow()
            .queue
            .keys()
            .map(str::to_string)
            .collect()
    }

    /// Cached keys, least recently used first.
    pub fn cached_keys(&self) -> Vec<String> {
        self.core.state.borrow().cache.keys_by_recency()
    }
}

fn ready(outcome: PreloadOutcome) -> Preload {
    future::ready(outcome).boxed_local().shared()
}

fn join_group(requests: Vec<(String, Preload)>) -> LocalBoxFuture<'static, GroupPreload> {
    if requests.is_empty() {
        return future::ready(GroupPreload::default()).boxed_local();
    }

    async move {
        let (keys, handles): (Vec<_>, Vec<_>) = requests.into_iter().unzip();
        let outcomes = future::join_all(handles).await;

        let mut report = GroupPreload::default();
        for (key, outcome) in keys.into_iter().zip(outcomes) {
            match outcome {
                Ok(Some(_)) => report.loaded.push(key),
                Ok(None) => report.unavailable.push(key),
                Err(PreloadError::Cancelled { .. }) => report.cancelled.push(key),
                Err(err @ PreloadError::Shutdown { .. }) => {
                    tracing::debug!(error = %err, "group member dropped");
                    report.unavailable.push(key);
                }
            }
        }
        report
    }
    .boxed_local()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
