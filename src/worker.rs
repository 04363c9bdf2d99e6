//! The dedicated animation worker. All engine state is owned by one
//! thread; events queue up on a channel and run to completion in order.
//! Cancellation goes through a condvar token the animation loops poll
//! once per frame, so a canceller blocks for at most one frame.

use std::sync::{mpsc, Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crate::engine::Engine;
use crate::events::Event;

#[derive(Default)]
struct CancelFlags {
    requested: bool,
    animating: bool,
    generation: u64,
}

/// Shared between the worker (which polls) and the host (which requests).
pub struct Cancel {
    flags: Mutex<CancelFlags>,
    cvar: Condvar,
}

impl Cancel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            flags: Mutex::new(CancelFlags::default()),
            cvar: Condvar::new(),
        })
    }

    /// Marks an animation loop as running. Any stale request is gone by
    /// now because `end` cleared it.
    pub(crate) fn begin(&self) {
        self.flags.lock().unwrap().animating = true;
    }

    /// Marks the loop finished, consuming a pending request and waking
    /// every waiting canceller.
    pub(crate) fn end(&self) {
        let mut flags = self.flags.lock().unwrap();
        flags.animating = false;
        flags.requested = false;
        flags.generation += 1;
        self.cvar.notify_all();
    }

    /// Polled by animation loops once per frame.
    pub(crate) fn should_stop(&self) -> bool {
        self.flags.lock().unwrap().requested
    }

    /// Sets the flag without waiting for the loop to observe it.
    pub fn request(&self) {
        self.flags.lock().unwrap().requested = true;
    }

    /// Requests cancellation and blocks until the loop that was in
    /// flight at call time has exited. Waiting on the generation, not
    /// just `animating`, keeps the wait bounded by the current loop:
    /// even if that loop's last frame never polled the request, its
    /// `end` advances the generation and releases the canceller before
    /// any later animation can hold it.
    pub fn cancel_and_wait(&self) {
        let mut flags = self.flags.lock().unwrap();
        if !flags.animating {
            return;
        }

        let observed = flags.generation;
        flags.requested = true;
        while flags.animating && flags.generation == observed {
            flags = self.cvar.wait(flags).unwrap();
        }
    }
}

/// Handle to the worker thread. Posting never blocks; `shutdown` (or
/// drop) cancels any running animation, drains the queue, and joins.
pub struct WallWorker {
    sender: mpsc::Sender<Event>,
    cancel: Arc<Cancel>,
    handle: Option<JoinHandle<Engine>>,
}

impl WallWorker {
    pub fn spawn(mut engine: Engine) -> Self {
        let cancel = engine.cancel_token();
        let (sender, receiver) = mpsc::channel::<Event>();

        let handle = thread::Builder::new()
            .name("bubblewall".into())
            .spawn(move || {
                while let Ok(event) = receiver.recv() {
                    if event == Event::Shutdown {
                        break;
                    }
                    engine.handle_event(event);
                }
                engine
            })
            .expect("failed to spawn the animation worker");

        Self {
            sender,
            cancel,
            handle: Some(handle),
        }
    }

    /// Queues an event for the worker. Hiding the surface also cancels
    /// whatever is mid-flight so the worker picks the event up promptly.
    pub fn post(&self, event: Event) {
        if matches!(event, Event::VisibilityChanged(false)) {
            self.cancel.cancel_and_wait();
        }

        if self.sender.send(event).is_err() {
            log::warn!("animation worker is gone, dropping {event:?}");
        }
    }

    pub fn cancel_token(&self) -> Arc<Cancel> {
        Arc::clone(&self.cancel)
    }

    /// Stops the worker and returns the engine in its final state.
    pub fn shutdown(mut self) -> Engine {
        self.cancel.cancel_and_wait();
        let _ = self.sender.send(Event::Shutdown);
        let handle = self.handle.take().expect("worker already joined");
        handle.join().expect("animation worker panicked")
    }
}

impl Drop for WallWorker {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancel.cancel_and_wait();
            let _ = self.sender.send(Event::Shutdown);
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn cancel_wait_ends_with_the_current_animation() {
        let cancel = Cancel::new();
        let token = Arc::clone(&cancel);

        // A short animation whose final frame never polls the request,
        // followed by a much longer one.
        let loops = thread::spawn(move || {
            token.begin();
            thread::sleep(Duration::from_millis(50));
            token.end();

            token.begin();
            thread::sleep(Duration::from_millis(500));
            token.end();
        });

        thread::sleep(Duration::from_millis(10));

        let start = Instant::now();
        cancel.cancel_and_wait();
        assert!(
            start.elapsed() < Duration::from_millis(300),
            "canceller waited into the next animation"
        );

        loops.join().unwrap();
    }

    #[test]
    fn cancel_wait_without_animation_returns_immediately() {
        let cancel = Cancel::new();
        cancel.cancel_and_wait();
        assert!(!cancel.should_stop());
    }
}
