//! Bubble records and the packing engine that lays them out.
//!
//! Layout is bounded rejection sampling: draw a random radius and center,
//! keep the candidate if it fits inside the surface and clears every
//! existing bubble by the padding distance, give up after a fixed number
//! of consecutive misses. Exhausting retries is how generation normally
//! ends, not a failure.

use rand::Rng;

use crate::graphics::Argb;
use crate::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub x: i32,
    pub y: i32,
    pub base_radius: i32,
    pub current_radius: f32,
    pub outline: Argb,
    pub fill: Argb,
}

impl Bubble {
    pub fn new(x: i32, y: i32, base_radius: i32, outline: Argb, fill: Argb) -> Self {
        Self {
            x,
            y,
            base_radius,
            current_radius: base_radius as f32,
            outline,
            fill,
        }
    }

    /// Rest radius of a screen-off bubble.
    pub fn minimized_radius(&self) -> i32 {
        (self.base_radius as f32 / 3.0).round() as i32
    }

    pub fn target_radius(&self, factor: f32) -> f32 {
        self.base_radius as f32 * factor
    }

    /// Hit test against the rest size, not the animated size, so touch
    /// targets don't shrink while bubbles are minimized.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let dx = (x - self.x) as i64;
        let dy = (y - self.y) as i64;
        dx * dx + dy * dy < (self.base_radius as i64).pow(2)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutParams {
    pub padding: i32,
    pub min_radius: i32,
    pub max_radius: i32,
    pub max_retries: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            padding: 50,
            min_radius: 20,
            max_radius: 250,
            max_retries: 50,
        }
    }
}

/// Packs non-overlapping bubbles into `width` x `height`. The result may
/// be sparse or empty; a surface too small for `min_radius` plus padding
/// produces no bubbles at all.
pub fn generate_layout<R: Rng>(
    width: i32,
    height: i32,
    params: &LayoutParams,
    rng: &mut R,
    palette: &mut Palette,
) -> Vec<Bubble> {
    let mut bubbles: Vec<Bubble> = Vec::new();

    'filling: loop {
        let mut retries = 0;

        let candidate = loop {
            if retries >= params.max_retries {
                break 'filling;
            }
            retries += 1;

            let radius = rng.gen_range(params.min_radius..params.max_radius);

            let lo = radius + params.padding;
            let hi_x = width - radius - params.padding;
            let hi_y = height - radius - params.padding;
            if lo >= hi_x || lo >= hi_y {
                continue;
            }

            let x = rng.gen_range(lo..hi_x);
            let y = rng.gen_range(lo..hi_y);

            if overlaps(&bubbles, x, y, radius, params.padding) {
                continue;
            }

            break (x, y, radius);
        };

        let (x, y, radius) = candidate;
        let (outline, fill) = palette.next_pair();
        bubbles.push(Bubble::new(x, y, radius, outline, fill));
    }

    log::debug!(
        "packed {} bubbles into {}x{}",
        bubbles.len(),
        width,
        height
    );

    bubbles
}

fn overlaps(bubbles: &[Bubble], x: i32, y: i32, radius: i32, padding: i32) -> bool {
    bubbles.iter().any(|bubble| {
        let dx = (x - bubble.x) as f64;
        let dy = (y - bubble.y) as f64;
        let distance = (dx * dx + dy * dy).sqrt();
        distance < (radius + bubble.base_radius + padding) as f64
    })
}

/// Index of the first bubble whose rest circle contains the point.
pub fn bubble_at(bubbles: &[Bubble], x: i32, y: i32) -> Option<usize> {
    bubbles.iter().position(|b| b.contains(x, y))
}
