use std::{cell::Cell, future::Future, pin::pin, time::Duration};

use futures::future::{Either, select};

use crate::assets::{
    loader::{AssetLoader, AssetState},
    priority::Priority,
};

/// How long a slide transition normally waits for its image.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Gate for showing an image: answers "is it ready" and "wait until it is, or give up".
#[derive(Debug)]
pub struct ImageReadiness {
    loader: AssetLoader,
    waiting: Cell<usize>,
}

impl ImageReadiness {
    /// Answer readiness questions from `loader`'s state.
    pub fn new(loader: AssetLoader) -> Self {
        Self {
            loader,
            waiting: Cell::new(0),
        }
    }

    /// `true` while at least one [`Self::wait_for_image`] is outstanding.
    pub fn is_loading(&self) -> bool {
        self.waiting.get() > 0
    }

    /// Whether `src` is in the loader's cache.
    pub fn is_image_ready(&self, src: &str) -> bool {
        self.loader.get_state(src) == AssetState::Loaded
    }

    /// Wait for `src` at `Critical` priority until `timeout` completes.
    ///
    /// A queued request for `src` under a lower class is cancelled and issued again as
    /// `Critical`; its earlier handles settle as cancelled.
    ///
    /// Returns `true` only when the image is loaded. A timeout leaves the load running, so
    /// a later call may find it cached.
    pub async fn wait_for_image(&self, src: &str, timeout: impl Future<Output = ()>) -> bool {
        if self.is_image_ready(src) {
            return true;
        }

        let _waiting = WaitGuard::enter(&self.waiting);
        // a lower-class request for `src` would be joined as is; requeue it at the front
        let requeued = self
            .loader
            .cancel_pending(|req| req.key() == src && req.priority() != Priority::Critical);
        if requeued > 0 {
            tracing::debug!(src, "promoting queued image to critical");
        }
        let preload = self.loader.preload_image(src, Priority::Critical);
        let timeout = pin!(timeout);
        match select(preload, timeout).await {
            Either::Left((Ok(Some(_)), _)) => true,
            Either::Left((Ok(None), _)) => false,
            Either::Left((Err(err), _)) => {
                tracing::warn!(src, error = %err, "image request was not served");
                false
            }
            Either::Right(((), _)) => {
                tracing::warn!(src, "image loading timed out");
                false
            }
        }
    }
}

/// Keeps the waiter count right even if the wait is dropped early.
struct WaitGuard<'a>(&'a Cell<usize>);

impl<'a> WaitGuard<'a> {
    fn enter(count: &'a Cell<usize>) -> Self {
        count.set(count.get() + 1);
        Self(count)
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/readiness.rs"]
mod tests;
