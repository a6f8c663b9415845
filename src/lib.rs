//! Slidecast is the asset preloading core of a grouped image/audio slideshow.
//!
//! A slideshow is a sequence of [`Group`]s, each an ordered list of images played over one
//! background audio track. Showing a slide promptly means its image (and, on a group change,
//! its audio) must already be fetched, while everything else keeps streaming in without
//! starving those requests. [`AssetLoader`] does that:
//!
//! - **Priority queue**: requests are `Critical`, `High` or `Normal`; higher classes are admitted
//!   first, FIFO within a class. Admission is non-preemptive.
//! - **Bounded concurrency**: at most `concurrency_limit` loads are in flight.
//! - **Deduplication**: concurrent requests for one key share a single [`Preload`] handle.
//! - **LRU cache**: completed keys are remembered up to `max_cache_size`.
//!
//! Loads are performed by a [`MediaSource`] and run as tasks on a caller-supplied
//! [`futures::task::LocalSpawn`]. [`Navigator`] and [`ImageReadiness`] are thin consumers that
//! decide what to prefetch and when a slide may be shown.
//!
//! ```no_run
//! use futures::executor::LocalPool;
//! use slidecast::{AssetLoader, FsMediaSource, Group, LoaderConfig, Priority};
//!
//! let mut pool = LocalPool::new();
//! let loader = AssetLoader::new(
//!     LoaderConfig::default(),
//!     FsMediaSource::new("assets"),
//!     pool.spawner(),
//! );
//! let group = Group::new("group1")
//!     .with_audio("group1/group1.ogg")
//!     .with_image("group1/g1-img1.jpg")
//!     .with_image("group1/g1-img2.jpg");
//!
//! let report = pool.run_until(loader.preload_group(&group, Priority::Critical));
//! println!("loaded {:?}", report.loaded);
//! ```
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod gallery;

pub use assets::cache::{Loaded, ResourceCache};
pub use assets::loader::{
    AssetKind, AssetLoader, AssetState, GroupPreload, LoaderStats, Preload, PreloadOutcome,
};
pub use assets::media::{
    AudioContainer, FsMediaSource, MediaSource, normalize_rel_path, sniff_audio_container,
};
pub use assets::priority::Priority;
pub use assets::queue::QueuedRequest;
pub use foundation::config::{
    DEFAULT_CONCURRENCY_LIMIT, DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_CACHE_SIZE, LoaderConfig,
    NavigatorConfig,
};
pub use foundation::error::{LoadError, PreloadError, SlidecastError, SlidecastResult};
pub use gallery::model::{Gallery, Group, ImageEntry};
pub use gallery::navigator::{EMPTY_GALLERY_CAPTION, Navigator, Slide};
pub use gallery::readiness::{DEFAULT_IMAGE_TIMEOUT, ImageReadiness};
