//! Engine state and the event router. The engine is owned by the worker
//! thread; every method here runs on that thread only.

pub mod anim;

use std::sync::Arc;

use fps_clock::FpsClock;
use rand::{rngs::StdRng, SeedableRng};

use crate::bubbles::{self, Bubble};
use crate::config::Config;
use crate::events::Event;
use crate::graphics::Argb;
use crate::palette::Palette;
use crate::render::{self, Backdrop};
use crate::surface::FrameSink;
use crate::worker::Cancel;

/// Resolves the host environment's theme. Queried when a theme or accent
/// change event arrives, and cached so redundant events don't redraw.
pub trait ThemeSource: Send {
    fn is_night_mode(&self) -> bool;
    fn accent_color(&self) -> Argb;
}

/// Theme that never changes. Useful headless and in tests.
pub struct StaticTheme {
    pub night_mode: bool,
    pub accent: Argb,
}

impl ThemeSource for StaticTheme {
    fn is_night_mode(&self) -> bool {
        self.night_mode
    }

    fn accent_color(&self) -> Argb {
        self.accent
    }
}

pub struct Engine {
    cfg: Config,
    sink: Box<dyn FrameSink>,
    theme: Box<dyn ThemeSource>,
    cancel: Arc<Cancel>,
    clock: Option<FpsClock>,
    rng: StdRng,
    palette: Palette,

    surface_width: usize,
    surface_height: usize,
    bubbles: Vec<Bubble>,

    night_mode: bool,
    accent: Argb,
    gradient_factor: f32,
    pressed: Option<usize>,
}

impl Engine {
    pub fn new(
        cfg: Config,
        sink: Box<dyn FrameSink>,
        theme: Box<dyn ThemeSource>,
    ) -> anyhow::Result<Self> {
        let palette = Palette::from_hex(&cfg.palette)?;

        let rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let clock = (cfg.fps > 0).then(|| FpsClock::new(cfg.fps));

        let night_mode = theme.is_night_mode();
        let accent = theme.accent_color();

        Ok(Self {
            cfg,
            sink,
            theme,
            cancel: Cancel::new(),
            clock,
            rng,
            palette,
            surface_width: 0,
            surface_height: 0,
            bubbles: Vec::new(),
            night_mode,
            accent,
            gradient_factor: 0.0,
            pressed: None,
        })
    }

    pub fn cancel_token(&self) -> Arc<Cancel> {
        Arc::clone(&self.cancel)
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn gradient_factor(&self) -> f32 {
        self.gradient_factor
    }

    pub fn night_mode(&self) -> bool {
        self.night_mode
    }

    pub fn surface_size(&self) -> (usize, usize) {
        (self.surface_width, self.surface_height)
    }

    /// Routes one host event to the matching animation. Runs the
    /// animation to completion (or cancellation) before returning.
    pub fn handle_event(&mut self, event: Event) {
        log::debug!("handling {event:?}");

        match event {
            Event::SurfaceChanged(width, height) => self.surface_changed(width, height),

            Event::Unlocked => self.animate_to_factor(1.0),

            Event::ScreenOff => self.set_factor(anim::SCREEN_OFF_FACTOR),

            Event::ThemeChanged => {
                let night = self.theme.is_night_mode();
                if night != self.night_mode {
                    self.night_mode = night;
                    self.night_transition();
                }
            }

            Event::AccentColorChanged => {
                let accent = self.theme.accent_color();
                if accent != self.accent {
                    self.accent = accent;
                    self.render_frame();
                }
            }

            Event::TouchDown(x, y) => {
                if self.pressed.is_none() {
                    if let Some(index) = bubbles::bubble_at(&self.bubbles, x, y) {
                        self.pressed = Some(index);
                        self.pulse(true);
                    }
                }
            }

            Event::TouchUp => {
                if self.pressed.is_some() {
                    self.pulse(false);
                    self.pressed = None;
                }
            }

            Event::ZoomChanged(zoom) => {
                self.set_factor((1.0 - zoom).max(anim::MIN_ZOOM_FACTOR));
            }

            Event::VisibilityChanged(visible) => {
                // The host already cancelled any in-flight animation on
                // hide; coming back just needs the current state redrawn.
                if visible {
                    self.render_frame();
                }
            }

            Event::Shutdown => {}
        }
    }

    fn surface_changed(&mut self, width: u32, height: u32) {
        self.surface_width = width as usize;
        self.surface_height = height as usize;

        self.night_mode = self.theme.is_night_mode();
        self.accent = self.theme.accent_color();
        self.pressed = None;

        self.bubbles = bubbles::generate_layout(
            width as i32,
            height as i32,
            &self.cfg.layout,
            &mut self.rng,
            &mut self.palette,
        );

        log::info!(
            "surface {}x{}: packed {} bubbles",
            width,
            height,
            self.bubbles.len()
        );

        self.maximize();
    }

    pub(crate) fn render_frame(&mut self) {
        let brightness = if self.night_mode { 0.0 } else { 1.0 };
        self.render_with_brightness(brightness);
    }

    fn render_with_brightness(&mut self, brightness: f32) {
        if self.surface_width == 0 || self.surface_height == 0 {
            return;
        }

        let backdrop = Backdrop {
            accent: self.accent,
            night_mode: self.night_mode,
            brightness,
            gradient_factor: self.gradient_factor,
        };

        let frame = self.sink.acquire(self.surface_width, self.surface_height);
        render::compose_frame(
            frame,
            self.surface_width,
            self.surface_height,
            &self.bubbles,
            &backdrop,
            self.cfg.outline_width,
        );

        if let Err(e) = self.sink.submit() {
            log::warn!("frame submission failed: {e:#}");
        }

        if let Some(clock) = self.clock.as_mut() {
            clock.tick();
        }
    }
}
