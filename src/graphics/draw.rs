//! Draw primitives over a raw `&mut [Argb]` frame, clipping at the edges.

use super::{
    blend::{self, Mixer},
    Argb, P2,
};

/// Blends an inclusive horizontal span, clipped to the frame.
fn span(frame: &mut [Argb], width: usize, height: usize, y: i32, x0: i32, x1: i32, c: Argb, b: Mixer) {
    if y < 0 || y >= height as i32 {
        return;
    }

    let xs = x0.max(0) as usize;
    let xe = x1.min(width as i32 - 1);
    if xe < 0 {
        return;
    }

    let row_start = y as usize * width;
    let Some(chunk) = frame.get_mut(row_start + xs..row_start + xe as usize + 1) else {
        return;
    };

    for p in chunk {
        *p = b(*p, c);
    }
}

pub fn fill_circle(
    frame: &mut [Argb],
    width: usize,
    height: usize,
    center: P2,
    radius: f32,
    c: Argb,
    b: Mixer,
) {
    if radius <= 0.0 {
        return;
    }

    let ri = radius as i32;
    for dy in -ri..=ri {
        let half = (radius * radius - (dy * dy) as f32).max(0.0).sqrt() as i32;
        span(
            frame,
            width,
            height,
            center.y + dy,
            center.x - half,
            center.x + half,
            c,
            b,
        );
    }
}

/// Stroked circle of the given stroke width, centered on `radius`.
pub fn stroke_circle(
    frame: &mut [Argb],
    width: usize,
    height: usize,
    center: P2,
    radius: f32,
    stroke: f32,
    c: Argb,
    b: Mixer,
) {
    let ro = radius + stroke * 0.5;
    let ri = (radius - stroke * 0.5).max(0.0);
    if ro <= 0.0 {
        return;
    }

    let roi = ro as i32;
    for dy in -roi..=roi {
        let dy2 = (dy * dy) as f32;
        let outer = (ro * ro - dy2).max(0.0).sqrt() as i32;
        let y = center.y + dy;

        if dy2 < ri * ri {
            let inner = (ri * ri - dy2).sqrt() as i32;
            span(frame, width, height, y, center.x - outer, center.x - inner, c, b);
            span(frame, width, height, y, center.x + inner, center.x + outer, c, b);
        } else {
            span(frame, width, height, y, center.x - outer, center.x + outer, c, b);
        }
    }
}

/// Full-frame vertical gradient: `dark` at the bottom edge, `bright` at
/// `y_bright` and everywhere above it.
pub fn vertical_gradient(
    frame: &mut [Argb],
    width: usize,
    height: usize,
    y_bright: f32,
    dark: Argb,
    bright: Argb,
) {
    let h = height as f32;
    let denom = h - y_bright;

    for (y, row) in frame.chunks_exact_mut(width).enumerate().take(height) {
        let t = if denom <= f32::EPSILON {
            1.0
        } else {
            ((h - y as f32) / denom).clamp(0.0, 1.0)
        };

        let c = blend::lerp(dark, bright, t);
        for p in row {
            *p = blend::mix(*p, c);
        }
    }
}

fn edge(a: P2, b: P2, p: P2) -> i64 {
    (b.x - a.x) as i64 * (p.y - a.y) as i64 - (b.y - a.y) as i64 * (p.x - a.x) as i64
}

/// Triangle whose alpha fades from full at the midpoint of `p1`..`p2`
/// to nothing at `p3`. This is the shape of a bubble's drop shadow.
pub fn shadow_triangle(
    frame: &mut [Argb],
    width: usize,
    height: usize,
    p1: P2,
    p2: P2,
    p3: P2,
    c: Argb,
) {
    let area = edge(p1, p2, p3);
    if area == 0 {
        return;
    }

    let x0 = p1.x.min(p2.x).min(p3.x).max(0);
    let x1 = p1.x.max(p2.x).max(p3.x).min(width as i32 - 1);
    let y0 = p1.y.min(p2.y).min(p3.y).max(0);
    let y1 = p1.y.max(p2.y).max(p3.y).min(height as i32 - 1);

    let mx = (p1.x + p2.x) as f32 * 0.5;
    let my = (p1.y + p2.y) as f32 * 0.5;
    let dx = p3.x as f32 - mx;
    let dy = p3.y as f32 - my;
    let len2 = dx * dx + dy * dy;
    if len2 <= f32::EPSILON {
        return;
    }

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = P2::new(x, y);
            let w0 = edge(p1, p2, p);
            let w1 = edge(p2, p3, p);
            let w2 = edge(p3, p1, p);

            let inside = if area > 0 {
                w0 >= 0 && w1 >= 0 && w2 >= 0
            } else {
                w0 <= 0 && w1 <= 0 && w2 <= 0
            };
            if !inside {
                continue;
            }

            let t = ((x as f32 - mx) * dx + (y as f32 - my) * dy) / len2;
            let faded = blend::scale_alpha(c, 1.0 - t.clamp(0.0, 1.0));

            let i = y as usize * width + x as usize;
            if let Some(px) = frame.get_mut(i) {
                *px = blend::mix(*px, faded);
            }
        }
    }
}
