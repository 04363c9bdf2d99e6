//! End-to-end runs through the worker thread: events posted from the
//! host side, final engine state inspected after shutdown.

use std::sync::{
    atomic::{AtomicUsize, Ordering::Relaxed},
    Arc,
};
use std::thread;
use std::time::Duration;

use bubblewall::{Config, Engine, Event, MemorySink, StaticTheme, WallWorker};

fn engine_with_counter(seed: u64, fps: u32) -> (Engine, Arc<AtomicUsize>) {
    let cfg = Config {
        fps,
        seed: Some(seed),
        ..Config::default()
    };

    let sink = MemorySink::new();
    let frames = sink.frame_counter();
    let theme = StaticTheme {
        night_mode: false,
        accent: bubblewall::config::DEFAULT_ACCENT,
    };

    let engine = Engine::new(cfg, Box::new(sink), Box::new(theme)).unwrap();
    (engine, frames)
}

#[test]
fn worker_runs_events_in_order() {
    let (engine, frames) = engine_with_counter(31, 0);
    let worker = WallWorker::spawn(engine);

    worker.post(Event::SurfaceChanged(800, 600));
    worker.post(Event::ScreenOff);
    worker.post(Event::Unlocked);

    let engine = worker.shutdown();

    assert_eq!(engine.surface_size(), (800, 600));
    assert!(!engine.bubbles().is_empty());
    for b in engine.bubbles() {
        assert_eq!(b.current_radius, b.base_radius as f32);
    }
    assert_eq!(engine.gradient_factor(), 1.0);

    // Setup renders twice, screen-off once, and the unlock at least once.
    assert!(frames.load(Relaxed) >= 4);
}

#[test]
fn hiding_the_surface_snaps_the_transition_to_its_target() {
    // Paced so the unlock transition is still mid-flight when the hide
    // arrives. If it happens to finish first the cancel is a no-op and
    // the assertions hold either way.
    let (engine, _) = engine_with_counter(37, 60);
    let worker = WallWorker::spawn(engine);

    worker.post(Event::SurfaceChanged(1000, 1000));
    worker.post(Event::ScreenOff);
    worker.post(Event::Unlocked);

    thread::sleep(Duration::from_millis(80));

    // Blocks until the worker has snapped to the final state.
    worker.post(Event::VisibilityChanged(false));

    let engine = worker.shutdown();
    for b in engine.bubbles() {
        assert_eq!(b.current_radius, b.base_radius as f32);
    }
    assert_eq!(engine.gradient_factor(), 1.0);
}

#[test]
fn touch_through_the_worker_leaves_bubbles_at_rest() {
    let (engine, _) = engine_with_counter(41, 0);
    let worker = WallWorker::spawn(engine);
    worker.post(Event::SurfaceChanged(1000, 1000));
    let engine = worker.shutdown();

    let target = engine.bubbles()[0];

    let worker = WallWorker::spawn(engine);
    worker.post(Event::TouchDown(target.x, target.y));
    worker.post(Event::TouchUp);

    let engine = worker.shutdown();
    for b in engine.bubbles() {
        assert_eq!(b.current_radius, b.base_radius as f32);
    }
}

#[test]
fn resize_repacks_the_field() {
    let (engine, _) = engine_with_counter(43, 0);
    let worker = WallWorker::spawn(engine);

    worker.post(Event::SurfaceChanged(1000, 1000));
    worker.post(Event::SurfaceChanged(400, 400));

    let engine = worker.shutdown();
    assert_eq!(engine.surface_size(), (400, 400));

    let (w, h) = engine.surface_size();
    for b in engine.bubbles() {
        assert!(b.x - b.base_radius >= 0 && b.x + b.base_radius <= w as i32);
        assert!(b.y - b.base_radius >= 0 && b.y + b.base_radius <= h as i32);
    }
}
