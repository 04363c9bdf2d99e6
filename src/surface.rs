//! The surface the engine draws to, abstracted so the worker can render
//! into a window-backed buffer or plain memory alike.

use std::sync::{
    atomic::{AtomicUsize, Ordering::Relaxed},
    Arc, Mutex,
};

use crate::graphics::Argb;

/// One frame's worth of drawable pixels. `acquire` hands out a frame of
/// the requested size, `submit` publishes it. Submission blocks for at
/// most one frame; the engine never retries it.
pub trait FrameSink: Send {
    fn acquire(&mut self, width: usize, height: usize) -> &mut [Argb];
    fn submit(&mut self) -> anyhow::Result<()>;
}

/// In-memory sink. Keeps the last submitted frame and counts submissions;
/// used by tests and headless embedders.
pub struct MemorySink {
    frame: Vec<Argb>,
    width: usize,
    height: usize,
    submitted: Arc<AtomicUsize>,
    published: Arc<Mutex<Vec<Argb>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            frame: Vec::new(),
            width: 0,
            height: 0,
            submitted: Arc::new(AtomicUsize::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared submission counter, readable after the sink moves into the
    /// engine.
    pub fn frame_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.submitted)
    }

    /// Shared copy of the last submitted frame, likewise readable after
    /// the move.
    pub fn published(&self) -> Arc<Mutex<Vec<Argb>>> {
        Arc::clone(&self.published)
    }

    pub fn last_frame(&self) -> (&[Argb], usize, usize) {
        (&self.frame, self.width, self.height)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for MemorySink {
    fn acquire(&mut self, width: usize, height: usize) -> &mut [Argb] {
        self.width = width;
        self.height = height;
        self.frame.resize(width * height, 0);
        &mut self.frame
    }

    fn submit(&mut self) -> anyhow::Result<()> {
        self.published
            .lock()
            .map_err(|_| anyhow::anyhow!("published frame poisoned"))?
            .clone_from(&self.frame);
        self.submitted.fetch_add(1, Relaxed);
        Ok(())
    }
}
