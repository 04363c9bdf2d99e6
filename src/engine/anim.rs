//! The animation driver: a handful of finite, interruptible loops that
//! step bubble radii and background brightness, one frame at a time.
//! Every loop follows the same shape: poll the cancellation token,
//! advance state, render, check termination.

use super::Engine;
use crate::bubbles::Bubble;

/// Per-frame radius step as a fraction of the base radius.
pub(crate) const SMOOTH_STEP: f32 = 0.05;
/// Easing never returns zero, so loops always make forward progress.
pub(crate) const SPEED_FLOOR: f32 = 0.001;

const PULSE_FRAMES: u32 = 5;
const PULSE_STEP: f32 = 1.0;
const BRIGHTNESS_STEPS: u32 = 20;

pub const SCREEN_OFF_FACTOR: f32 = 1.0 / 3.0;
pub const MIN_ZOOM_FACTOR: f32 = 0.3;

/// Triangular ease over the remaining distance: ramps up from the start,
/// peaks halfway, ramps down toward the target.
pub fn speed_modifier(range: f32, to_go: f32) -> f32 {
    let half = range / 2.0;
    if half <= 0.0 {
        return SPEED_FLOOR;
    }

    let mut m = to_go / half;
    if m > 1.0 {
        m = 2.0 - m;
    }
    m.max(SPEED_FLOOR)
}

/// One smooth-transition frame: every bubble steps toward its own target,
/// clamped so it lands on the target exactly instead of overshooting.
pub(crate) fn advance_radii(
    bubbles: &mut [Bubble],
    targets: &[f32],
    ranges: &[f32],
    expanding: bool,
) {
    let direction = if expanding { 1.0 } else { -1.0 };

    for ((bubble, &target), &range) in bubbles.iter_mut().zip(targets).zip(ranges) {
        let to_go = target - bubble.current_radius;
        let m = speed_modifier(range.abs(), to_go.abs());

        bubble.current_radius += bubble.base_radius as f32 * SMOOTH_STEP * m * direction;
        bubble.current_radius = if expanding {
            bubble.current_radius.min(target)
        } else {
            bubble.current_radius.max(target)
        };
    }
}

/// Gradient height tracking the lead bubble, never moving against the
/// direction of the transition.
pub(crate) fn next_gradient(prev: f32, frac: f32, expanding: bool) -> f32 {
    if expanding {
        prev.max(frac)
    } else {
        prev.min(frac)
    }
}

impl Engine {
    /// Single-shot resize of every bubble to `base * factor`, one frame.
    pub(crate) fn set_factor(&mut self, factor: f32) {
        for bubble in &mut self.bubbles {
            bubble.current_radius = bubble.target_radius(factor);
        }
        self.gradient_factor = factor.clamp(0.0, 1.0);
        self.render_frame();
    }

    pub(crate) fn minimize(&mut self) {
        for bubble in &mut self.bubbles {
            bubble.current_radius = bubble.minimized_radius() as f32;
        }
        self.gradient_factor = SCREEN_OFF_FACTOR;
        self.render_frame();
    }

    /// Restores every bubble to full size. Rendered twice so both halves
    /// of a double-buffered surface end up with the same content.
    pub(crate) fn maximize(&mut self) {
        for bubble in &mut self.bubbles {
            bubble.current_radius = bubble.base_radius as f32;
        }
        self.gradient_factor = 1.0;
        self.render_frame();
        self.render_frame();
    }

    /// Multi-frame transition of every bubble toward `base * factor`,
    /// with the triangular ease. Direction is decided once, from the
    /// first bubble. Cancellation snaps all bubbles straight to target.
    pub(crate) fn animate_to_factor(&mut self, factor: f32) {
        if self.bubbles.is_empty() {
            return;
        }

        let targets: Vec<f32> = self
            .bubbles
            .iter()
            .map(|b| b.target_radius(factor))
            .collect();
        let ranges: Vec<f32> = self
            .bubbles
            .iter()
            .zip(&targets)
            .map(|(b, &t)| t - b.current_radius)
            .collect();

        if ranges[0] == 0.0 {
            return;
        }
        let expanding = ranges[0] > 0.0;
        let base0 = self.bubbles[0].base_radius as f32;

        self.cancel.begin();
        loop {
            if self.cancel.should_stop() {
                for (bubble, &target) in self.bubbles.iter_mut().zip(&targets) {
                    bubble.current_radius = target;
                }
                self.gradient_factor = factor.clamp(0.0, 1.0);
                self.render_frame();
                break;
            }

            advance_radii(&mut self.bubbles, &targets, &ranges, expanding);

            let frac = (self.bubbles[0].current_radius / base0).clamp(0.0, 1.0);
            self.gradient_factor = next_gradient(self.gradient_factor, frac, expanding);

            self.render_frame();

            // The clamp in advance_radii makes arrival exact, so equality
            // is a safe termination test here.
            let done = self
                .bubbles
                .iter()
                .zip(&targets)
                .all(|(b, &t)| b.current_radius == t);
            if done {
                break;
            }
        }
        self.cancel.end();
    }

    /// Touch feedback on the pressed bubble only: a few frames of growth
    /// on press, the mirror image on release.
    pub(crate) fn pulse(&mut self, expand: bool) {
        let Some(index) = self.pressed else {
            return;
        };
        let delta = if expand { PULSE_STEP } else { -PULSE_STEP };

        self.cancel.begin();
        let mut frames_left = PULSE_FRAMES;
        while frames_left > 0 {
            if self.cancel.should_stop() {
                self.bubbles[index].current_radius += delta * frames_left as f32;
                self.render_frame();
                break;
            }

            self.bubbles[index].current_radius += delta;
            frames_left -= 1;
            self.render_frame();
        }
        self.cancel.end();
    }

    /// Fades the background gray toward the new ui mode's rest
    /// brightness, re-rendering the full bubble set at every step.
    pub(crate) fn night_transition(&mut self) {
        self.cancel.begin();
        for x in 0..=BRIGHTNESS_STEPS {
            if self.cancel.should_stop() {
                self.render_frame();
                break;
            }

            let t = x as f32 / BRIGHTNESS_STEPS as f32;
            let brightness = if self.night_mode { 1.0 - t } else { t };
            self.render_with_brightness(brightness);
        }
        self.cancel.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, DEFAULT_ACCENT};
    use crate::engine::{StaticTheme, ThemeSource};
    use crate::events::Event;
    use crate::graphics::{blend, Argb};
    use crate::surface::MemorySink;
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering::Relaxed},
        Arc,
    };

    /// Theme double whose night flag the test can flip mid-run.
    struct FlipTheme {
        night: Arc<AtomicBool>,
    }

    impl ThemeSource for FlipTheme {
        fn is_night_mode(&self) -> bool {
            self.night.load(Relaxed)
        }

        fn accent_color(&self) -> Argb {
            DEFAULT_ACCENT
        }
    }

    fn engine(seed: u64) -> (Engine, Arc<AtomicUsize>) {
        let cfg = Config {
            fps: 0,
            seed: Some(seed),
            ..Config::default()
        };

        let sink = MemorySink::new();
        let frames = sink.frame_counter();
        let theme = StaticTheme {
            night_mode: false,
            accent: DEFAULT_ACCENT,
        };

        let mut engine = Engine::new(cfg, Box::new(sink), Box::new(theme)).unwrap();
        engine.handle_event(Event::SurfaceChanged(1000, 1000));
        assert!(!engine.bubbles().is_empty());

        (engine, frames)
    }

    #[test]
    fn speed_modifier_is_triangular() {
        assert_eq!(speed_modifier(100.0, 50.0), 1.0); // peak at the midpoint
        assert_eq!(speed_modifier(100.0, 25.0), 0.5);
        assert_eq!(speed_modifier(100.0, 75.0), 0.5);
        // Never zero at either end.
        assert_eq!(speed_modifier(100.0, 100.0), SPEED_FLOOR);
        assert_eq!(speed_modifier(100.0, 0.0), SPEED_FLOOR);
        assert_eq!(speed_modifier(0.0, 0.0), SPEED_FLOOR);
    }

    #[test]
    fn advance_converges_monotonically_without_overshoot() {
        let (engine, _) = engine(5);
        let mut bubbles = engine.bubbles().to_vec();
        for b in &mut bubbles {
            b.current_radius = b.minimized_radius() as f32;
        }

        let targets: Vec<f32> = bubbles.iter().map(|b| b.base_radius as f32).collect();
        let ranges: Vec<f32> = bubbles
            .iter()
            .zip(&targets)
            .map(|(b, &t)| t - b.current_radius)
            .collect();

        let mut prev = bubbles[0].current_radius;
        let mut converged = false;

        for _ in 0..100_000 {
            advance_radii(&mut bubbles, &targets, &ranges, true);

            assert!(bubbles[0].current_radius >= prev, "radius regressed");
            prev = bubbles[0].current_radius;

            for (b, &t) in bubbles.iter().zip(&targets) {
                assert!(b.current_radius <= t, "radius overshot its target");
            }

            if bubbles.iter().zip(&targets).all(|(b, &t)| b.current_radius == t) {
                converged = true;
                break;
            }
        }

        assert!(converged, "smooth transition did not terminate");
    }

    #[test]
    fn unlock_after_screen_off_restores_full_size() {
        let (mut engine, _) = engine(7);

        engine.handle_event(Event::ScreenOff);
        for b in engine.bubbles() {
            assert_eq!(b.current_radius, b.base_radius as f32 * SCREEN_OFF_FACTOR);
        }

        engine.handle_event(Event::Unlocked);
        for b in engine.bubbles() {
            assert_eq!(b.current_radius, b.base_radius as f32);
        }
        assert_eq!(engine.gradient_factor(), 1.0);
    }

    #[test]
    fn gradient_never_regresses() {
        let mut g = 0.2;
        for frac in [0.1, 0.3, 0.25, 0.6, 1.0] {
            let next = next_gradient(g, frac, true);
            assert!(next >= g);
            g = next;
        }
        assert_eq!(g, 1.0);

        let mut g = 0.9;
        for frac in [1.0, 0.7, 0.8, 0.3] {
            let next = next_gradient(g, frac, false);
            assert!(next <= g);
            g = next;
        }
    }

    #[test]
    fn zoom_clamps_to_minimum_factor() {
        let (mut engine, _) = engine(9);

        engine.handle_event(Event::ZoomChanged(1.0));
        for b in engine.bubbles() {
            assert_eq!(b.current_radius, b.base_radius as f32 * MIN_ZOOM_FACTOR);
        }

        engine.handle_event(Event::ZoomChanged(0.5));
        for b in engine.bubbles() {
            assert_eq!(b.current_radius, b.base_radius as f32 * 0.5);
        }
    }

    #[test]
    fn touch_pulse_returns_to_rest_radius() {
        let (mut engine, frames) = engine(11);

        let target = engine.bubbles()[0];
        let before = target.current_radius;
        let start = frames.load(std::sync::atomic::Ordering::Relaxed);

        engine.handle_event(Event::TouchDown(target.x, target.y));
        let pressed = engine.bubbles()[0].current_radius;
        assert_eq!(pressed, before + PULSE_FRAMES as f32 * PULSE_STEP);

        // A second press while the first is held is ignored.
        engine.handle_event(Event::TouchDown(target.x, target.y));
        assert_eq!(engine.bubbles()[0].current_radius, pressed);

        engine.handle_event(Event::TouchUp);
        assert_eq!(engine.bubbles()[0].current_radius, before);

        let spent = frames.load(std::sync::atomic::Ordering::Relaxed) - start;
        assert_eq!(spent as u32, PULSE_FRAMES * 2);
    }

    #[test]
    fn touch_outside_any_bubble_is_ignored() {
        let (mut engine, frames) = engine(13);
        let start = frames.load(std::sync::atomic::Ordering::Relaxed);

        // Padding keeps every bubble's rest circle away from the corner.
        engine.handle_event(Event::TouchDown(0, 0));
        engine.handle_event(Event::TouchUp);

        assert_eq!(frames.load(std::sync::atomic::Ordering::Relaxed), start);
    }

    #[test]
    fn cancelled_transition_matches_single_shot() {
        let (mut reference, _) = engine(17);
        reference.handle_event(Event::ScreenOff);
        reference.set_factor(1.0);

        let (mut cancelled, frames) = engine(17);
        cancelled.handle_event(Event::ScreenOff);

        let start = frames.load(std::sync::atomic::Ordering::Relaxed);
        cancelled.cancel_token().request();
        cancelled.handle_event(Event::Unlocked);

        assert_eq!(cancelled.bubbles(), reference.bubbles());
        assert_eq!(cancelled.gradient_factor(), reference.gradient_factor());

        // The snap renders exactly one frame.
        assert_eq!(frames.load(std::sync::atomic::Ordering::Relaxed) - start, 1);
    }

    #[test]
    fn redundant_theme_event_does_not_redraw() {
        let (mut engine, frames) = engine(19);
        let start = frames.load(std::sync::atomic::Ordering::Relaxed);

        engine.handle_event(Event::ThemeChanged);
        engine.handle_event(Event::AccentColorChanged);

        assert_eq!(frames.load(std::sync::atomic::Ordering::Relaxed), start);
    }

    #[test]
    fn theme_flip_fades_the_background_over_twenty_steps() {
        let cfg = Config {
            fps: 0,
            seed: Some(29),
            ..Config::default()
        };
        let sink = MemorySink::new();
        let frames = sink.frame_counter();
        let published = sink.published();

        let night = Arc::new(AtomicBool::new(false));
        let theme = FlipTheme {
            night: Arc::clone(&night),
        };

        let mut engine = Engine::new(cfg, Box::new(sink), Box::new(theme)).unwrap();
        engine.handle_event(Event::SurfaceChanged(1000, 1000));
        assert!(!engine.night_mode());

        // Padding keeps bubbles and their shadows away from the corner,
        // so this pixel is pure background plus gradient.
        let corner_green = || blend::decompose(published.lock().unwrap()[0])[2];
        let day_green = corner_green();

        let start = frames.load(Relaxed);
        night.store(true, Relaxed);
        engine.handle_event(Event::ThemeChanged);

        assert!(engine.night_mode());
        assert_eq!(frames.load(Relaxed) - start, BRIGHTNESS_STEPS as usize + 1);
        assert!(corner_green() < day_green, "background did not darken");

        // A pending cancel snaps straight to the new rest brightness.
        let start = frames.load(Relaxed);
        night.store(false, Relaxed);
        engine.cancel_token().request();
        engine.handle_event(Event::ThemeChanged);

        assert!(!engine.night_mode());
        assert_eq!(frames.load(Relaxed) - start, 1);
        assert_eq!(corner_green(), day_green);
    }

    #[test]
    fn minimize_rounds_to_a_third() {
        let (mut engine, _) = engine(23);
        engine.minimize();
        for b in engine.bubbles() {
            assert_eq!(b.current_radius, (b.base_radius as f32 / 3.0).round());
        }
    }
}
