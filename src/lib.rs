//! An animated bubble wallpaper: a randomly packed field of circles
//! that swells, shrinks, and dims in response to host lifecycle events.
//!
//! The crate splits into the engine (layout, animation, and software
//! rendering, driven by a dedicated worker thread) and a windowed host
//! that feeds it events from a winit event loop.

pub mod bubbles;
pub mod config;
pub mod engine;
pub mod events;
pub mod graphics;
pub mod palette;
pub mod render;
pub mod surface;
pub mod window;
pub mod worker;

pub use config::Config;
pub use engine::{Engine, StaticTheme, ThemeSource};
pub use events::Event;
pub use surface::{FrameSink, MemorySink};
pub use worker::{Cancel, WallWorker};
