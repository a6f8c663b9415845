use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use futures::future::LocalBoxFuture;

use crate::{
    assets::{
        loader::{AssetLoader, GroupPreload},
        priority::Priority,
    },
    foundation::config::NavigatorConfig,
    gallery::model::Gallery,
};

/// Caption of the slide reported for an empty gallery.
pub const EMPTY_GALLERY_CAPTION: &str = "No images found";

/// Groups further than this from the current one are not prefetched.
const PREFETCH_RADIUS: usize = 2;

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// One image of the flattened gallery, with its group context.
pub struct Slide {
    /// Image id, if the descriptor had one.
    pub id: Option<String>,
    /// Image key.
    pub src: String,
    /// Caption, if any.
    pub caption: Option<String>,
    /// Owning group id.
    pub group_id: String,
    /// 0-based index of the owning group.
    pub group_index: usize,
    /// Number of images in the owning group.
    pub group_total: usize,
    /// 0-based index within the owning group.
    pub image_index: usize,
    /// Owning group's audio key.
    pub audio_src: Option<String>,
}

/// Linear slide cursor over a [`Gallery`] that keeps the loader fed around the current group.
#[derive(Debug)]
pub struct Navigator {
    gallery: Gallery,
    slides: Vec<Slide>,
    current: usize,
    loader: AssetLoader,
    debounce: Duration,
    last_move: Option<Instant>,
    placeholder: Slide,
}

impl Navigator {
    /// Flatten `gallery` and start at the first slide.
    pub fn new(gallery: Gallery, loader: AssetLoader, config: NavigatorConfig) -> Self {
        let slides = flatten(&gallery);
        Self {
            gallery,
            slides,
            current: 0,
            loader,
            debounce: config.debounce(),
            last_move: None,
            placeholder: Slide {
                caption: Some(EMPTY_GALLERY_CAPTION.to_string()),
                ..Slide::default()
            },
        }
    }

    /// Prefetch around the first slide; resolves when the first group's critical set settles.
    pub fn init(&self) -> LocalBoxFuture<'static, GroupPreload> {
        self.prefetch();
        self.loader
            .preload_group_critical(self.gallery.groups.first(), Priority::Critical)
    }

    /// Gallery being navigated.
    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// Loader the navigator prefetches through.
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    /// All slides, in play order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// 0-based index of the current slide.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Current slide, or a placeholder captioned [`EMPTY_GALLERY_CAPTION`] when there are none.
    pub fn current_slide(&self) -> &Slide {
        self.slides.get(self.current).unwrap_or(&self.placeholder)
    }

    /// Whether a slide follows the current one.
    pub fn has_next(&self) -> bool {
        self.current + 1 < self.slides.len()
    }

    /// Whether a slide precedes the current one.
    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    /// Advance one slide. Refused at the end or inside the debounce window.
    pub fn next(&mut self, now: Instant) -> bool {
        if !self.has_next() || self.debounced(now) {
            return false;
        }
        self.current += 1;
        self.moved(now);
        true
    }

    /// Step back one slide. Refused at the start or inside the debounce window.
    pub fn prev(&mut self, now: Instant) -> bool {
        if !self.has_previous() || self.debounced(now) {
            return false;
        }
        self.current -= 1;
        self.moved(now);
        true
    }

    /// Whether moving from `from` to `to` crosses into another group (audio crossfade point).
    pub fn is_new_group(from: &Slide, to: &Slide) -> bool {
        from.group_id != to.group_id
    }

    /// Group of the current slide; `None` for an empty gallery.
    pub fn current_group_index(&self) -> Option<usize> {
        self.slides.get(self.current).map(|s| s.group_index)
    }

    /// Prefetch class for group `index` given its distance from the current group.
    pub fn priority_for_group(&self, index: usize) -> Option<Priority> {
        let current = self.current_group_index()?;
        match index.abs_diff(current) {
            0 => Some(Priority::Critical),
            1 => Some(Priority::High),
            2 => Some(Priority::Normal),
            _ => None,
        }
    }

    /// Queue the groups around the current one at their distance class.
    ///
    /// Nearest groups are issued first, forward before backward. A still-queued request is
    /// cancelled and issued again when its key left the window or was queued under another
    /// class than the one wanted now, so the current group never waits behind a group the
    /// viewer moved away from. Returns the number of queued requests cancelled.
    pub fn prefetch(&self) -> usize {
        let Some(current) = self.current_group_index() else {
            return 0;
        };

        let mut order: Vec<usize> = (0..self.gallery.groups.len())
            .filter(|i| i.abs_diff(current) <= PREFETCH_RADIUS)
            .collect();
        order.sort_by_key(|&i| (i.abs_diff(current), i < current));

        let mut plan = Vec::with_capacity(order.len());
        let mut wanted: HashMap<&str, Priority> = HashMap::new();
        for index in order {
            let Some(priority) = self.priority_for_group(index) else {
                continue;
            };
            let group = &self.gallery.groups[index];
            let critical = group.critical_keys();
            for key in group.keys() {
                let class = if critical.contains(&key) {
                    priority
                } else {
                    priority.demoted()
                };
                wanted
                    .entry(key)
                    .and_modify(|p| {
                        if class.rank() < p.rank() {
                            *p = class;
                        }
                    })
                    .or_insert(class);
            }
            plan.push((group, priority));
        }

        let cancelled = self.loader.cancel_pending(|req| {
            wanted.get(req.key()) != Some(&req.priority())
        });
        if cancelled > 0 {
            tracing::debug!(cancelled, group = current, "re-queueing stale prefetches");
        }

        for (group, priority) in plan {
            // handles are dropped; the loader drives admitted loads on its own
            let _ = self.loader.preload_group_critical(group, priority);
            let _ = self
                .loader
                .preload_group_background(group, priority.demoted());
        }
        cancelled
    }

    fn debounced(&self, now: Instant) -> bool {
        match self.last_move {
            Some(last) => now.saturating_duration_since(last) < self.debounce,
            None => false,
        }
    }

    fn moved(&mut self, now: Instant) {
        self.last_move = Some(now);
        self.prefetch();
    }
}

fn flatten(gallery: &Gallery) -> Vec<Slide> {
    let mut slides = Vec::new();
    for (group_index, group) in gallery.groups.iter().enumerate() {
        for (image_index, image) in group.images.iter().enumerate() {
            slides.push(Slide {
                id: image.id.clone(),
                src: image.src.clone(),
                caption: image.caption.clone(),
                group_id: group.id.clone(),
                group_index,
                group_total: group.images.len(),
                image_index,
                audio_src: group.audio_src.clone(),
            });
        }
    }
    slides
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/navigator.rs"]
mod tests;
