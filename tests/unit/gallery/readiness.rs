use std::{cell::RefCell, collections::HashMap, rc::Rc};

use futures::{
    channel::oneshot,
    executor::LocalPool,
    future::{self, FutureExt as _, LocalBoxFuture},
    task::LocalSpawnExt as _,
};

use super::*;
use crate::{
    assets::media::MediaSource,
    foundation::{config::LoaderConfig, error::LoadError},
};

type Gate = oneshot::Sender<Result<(), LoadError>>;

/// Loads stay open until the test opens their gate.
#[derive(Clone, Default)]
struct GateMedia {
    gates: Rc<RefCell<HashMap<String, Gate>>>,
    started: Rc<RefCell<Vec<String>>>,
}

impl GateMedia {
    fn open(&self, src: &str, result: Result<(), LoadError>) {
        let gate = self.gates.borrow_mut().remove(src).expect("load was started");
        gate.send(result).unwrap();
    }

    fn gate(&self, src: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(src.to_string(), tx);
        self.started.borrow_mut().push(src.to_string());
        let src = src.to_string();
        rx.map(move |r| r.unwrap_or_else(|_| Err(LoadError::io(src, "gate dropped"))))
            .boxed_local()
    }
}

impl MediaSource for GateMedia {
    fn load_image(&self, src: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        self.gate(src)
    }

    fn load_audio(&self, src: &str) -> LocalBoxFuture<'static, Result<(), LoadError>> {
        self.gate(src)
    }
}

fn setup(slots: usize) -> (LocalPool, GateMedia, Rc<ImageReadiness>) {
    let pool = LocalPool::new();
    let media = GateMedia::default();
    let loader = AssetLoader::new(
        LoaderConfig {
            max_cache_size: 50,
            concurrency_limit: slots,
        },
        media.clone(),
        pool.spawner(),
    );
    (pool, media, Rc::new(ImageReadiness::new(loader)))
}

/// Run `wait_for_image` as a task; the slot fills once it answers.
fn spawn_wait(
    pool: &LocalPool,
    readiness: &Rc<ImageReadiness>,
    src: &str,
    timeout: impl Future<Output = ()> + 'static,
) -> Rc<RefCell<Option<bool>>> {
    let slot = Rc::new(RefCell::new(None));
    let out = Rc::clone(&slot);
    let readiness = Rc::clone(readiness);
    let src = src.to_string();
    pool.spawner()
        .spawn_local(async move {
            let ready = readiness.wait_for_image(&src, timeout).await;
            *out.borrow_mut() = Some(ready);
        })
        .unwrap();
    slot
}

#[test]
fn loaded_image_is_ready_without_waiting() {
    let (mut pool, media, readiness) = setup(6);
    let handle = readiness.loader.preload_image("a.jpg", Priority::Normal);
    pool.run_until_stalled();
    media.open("a.jpg", Ok(()));
    pool.run_until(handle).unwrap();

    assert!(readiness.is_image_ready("a.jpg"));
    assert!(pool.run_until(readiness.wait_for_image("a.jpg", future::pending())));
}

#[test]
fn wait_succeeds_when_load_beats_timeout() {
    let (mut pool, media, readiness) = setup(6);
    let (_fire, timer) = oneshot::channel::<()>();

    let ready = spawn_wait(&pool, &readiness, "a.jpg", timer.map(|_| ()));
    pool.run_until_stalled();
    assert!(readiness.is_loading());
    assert_eq!(*ready.borrow(), None);

    media.open("a.jpg", Ok(()));
    pool.run_until_stalled();

    assert_eq!(*ready.borrow(), Some(true));
    assert!(!readiness.is_loading());
    assert!(readiness.is_image_ready("a.jpg"));
}

#[test]
fn timeout_reports_false_but_load_keeps_going() {
    let (mut pool, media, readiness) = setup(6);
    let (fire, timer) = oneshot::channel::<()>();

    let ready = spawn_wait(&pool, &readiness, "slow.jpg", timer.map(|_| ()));
    pool.run_until_stalled();
    fire.send(()).unwrap();
    pool.run_until_stalled();

    assert_eq!(*ready.borrow(), Some(false));
    assert!(!readiness.is_loading());
    assert_eq!(readiness.loader.get_state("slow.jpg"), AssetState::Loading);

    media.open("slow.jpg", Ok(()));
    pool.run_until_stalled();
    assert!(readiness.is_image_ready("slow.jpg"));
}

#[test]
fn failed_load_is_not_ready() {
    let (mut pool, media, readiness) = setup(6);

    let ready = spawn_wait(&pool, &readiness, "bad.jpg", future::pending());
    pool.run_until_stalled();
    media.open("bad.jpg", Err(LoadError::decode("bad.jpg", "truncated")));
    pool.run_until_stalled();

    assert_eq!(*ready.borrow(), Some(false));
    assert!(!readiness.is_image_ready("bad.jpg"));
}

#[test]
fn waited_image_is_requeued_as_critical() {
    let (mut pool, media, readiness) = setup(1);
    let loader = &readiness.loader;
    let _busy = loader.preload_audio("track.ogg", Priority::Normal);
    let _other = loader.preload_image("other.jpg", Priority::High);
    let stale = loader.preload_image("shown.jpg", Priority::Normal);
    assert_eq!(loader.queued_keys(), vec!["other.jpg", "shown.jpg"]);

    let ready = spawn_wait(&pool, &readiness, "shown.jpg", future::ready(()));
    pool.run_until_stalled();

    assert_eq!(*ready.borrow(), Some(false));
    assert_eq!(loader.queued_keys(), vec!["shown.jpg", "other.jpg"]);
    assert!(pool.run_until(stale).unwrap_err().is_cancelled());

    media.open("track.ogg", Ok(()));
    pool.run_until_stalled();
    assert_eq!(*media.started.borrow(), vec!["track.ogg", "shown.jpg"]);
}
