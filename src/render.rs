//! The frame compositor. Stateless: background, accent gradient, one full
//! shadow pass, then one fill/outline pass, so no fill ever covers a
//! neighbor's shadow.

use std::f32::consts::PI;

use crate::bubbles::Bubble;
use crate::graphics::{blend, draw, Argb, P2};

/// Shadow tip offset as a multiple of the base radius.
const SHADOW_REACH: f32 = 1.2;
const SHADOW_ALPHA: f32 = 0.5;

const GRADIENT_SPAN: f32 = 0.75;
const DARK_STOP_NIGHT_ALPHA: f32 = 0.1;
const DARK_STOP_DAY_ALPHA: f32 = 0.6;
const BRIGHT_STOP_ALPHA: f32 = 0.3;

#[derive(Debug, Clone, Copy)]
pub struct Backdrop {
    pub accent: Argb,
    pub night_mode: bool,
    /// Background gray level, 0 black to 1 white.
    pub brightness: f32,
    /// How far up the surface the accent gradient reaches, 0 to 1.
    pub gradient_factor: f32,
}

pub fn compose_frame(
    frame: &mut [Argb],
    width: usize,
    height: usize,
    bubbles: &[Bubble],
    backdrop: &Backdrop,
    outline_width: i32,
) {
    frame.fill(blend::gray(backdrop.brightness));

    let dark_alpha = if backdrop.night_mode {
        DARK_STOP_NIGHT_ALPHA
    } else {
        DARK_STOP_DAY_ALPHA
    };
    let dark = blend::scale_alpha(backdrop.accent, dark_alpha);
    let bright = blend::scale_alpha(backdrop.accent, BRIGHT_STOP_ALPHA);

    let y_bright = height as f32 - height as f32 * (backdrop.gradient_factor * GRADIENT_SPAN);
    draw::vertical_gradient(frame, width, height, y_bright, dark, bright);

    // Shadows for every bubble before any fill.
    for bubble in bubbles {
        if bubble.current_radius <= 0.0 {
            continue;
        }

        let r = bubble.current_radius;
        let p1 = P2::new(
            (r * (PI * 0.25).cos()) as i32 + bubble.x,
            (r * (PI * 0.25).sin()) as i32 + bubble.y,
        );
        let p2 = P2::new(
            (r * (PI * 1.25).cos()) as i32 + bubble.x,
            (r * (PI * 1.25).sin()) as i32 + bubble.y,
        );
        let tip = P2::new(
            (bubble.x as f32 + bubble.base_radius as f32 * SHADOW_REACH) as i32,
            (bubble.y as f32 - bubble.base_radius as f32 * SHADOW_REACH) as i32,
        );

        let shadow = blend::scale_alpha(bubble.outline, SHADOW_ALPHA);
        draw::shadow_triangle(frame, width, height, p1, p2, tip, shadow);
    }

    for bubble in bubbles {
        if bubble.current_radius <= 0.0 {
            continue;
        }

        let center = P2::new(bubble.x, bubble.y);
        draw::fill_circle(
            frame,
            width,
            height,
            center,
            bubble.current_radius,
            bubble.fill,
            blend::mix,
        );

        // Outline half-inset so it hugs the inside of the filled edge.
        draw::stroke_circle(
            frame,
            width,
            height,
            center,
            bubble.current_radius - outline_width as f32 * 0.5,
            outline_width as f32,
            bubble.outline,
            blend::mix,
        );
    }
}
