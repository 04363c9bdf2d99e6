use crate::bubbles::LayoutParams;
use crate::graphics::Argb;
use crate::palette::{self, DEFAULT_PALETTE};

pub const DEFAULT_OUTLINE_WIDTH: i32 = 30;
pub const DEFAULT_FPS: u32 = 60;
/// Holo blue, the fallback accent.
pub const DEFAULT_ACCENT: Argb = 0xFF_33_B5_E5;

pub const DEFAULT_WIDTH: u32 = 540;
pub const DEFAULT_HEIGHT: u32 = 960;

#[derive(Clone)]
pub struct Config {
    pub layout: LayoutParams,
    pub outline_width: i32,
    /// Flat list of hex colors, alternating outline and fill.
    pub palette: Vec<String>,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Animation frame rate. 0 disables pacing (frames run back to back).
    pub fps: u32,
    pub night_mode: bool,
    pub accent: Argb,
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutParams::default(),
            outline_width: DEFAULT_OUTLINE_WIDTH,
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            seed: None,
            fps: DEFAULT_FPS,
            night_mode: false,
            accent: DEFAULT_ACCENT,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Config {
    pub fn eval_args(mut self, args: &mut dyn Iterator<Item = String>) -> Self {
        let mut args = args.peekable();
        args.next(); // program name

        loop {
            let arg = match args.next() {
                Some(st) => st,
                None => break,
            };

            match arg.as_str() {
                "--size" => {
                    let s = args
                        .next()
                        .expect("Argument error: Expected WxH value for size.")
                        .split('x')
                        .map(|x| x.parse::<u32>().expect("Argument error: Invalid value"))
                        .collect::<Vec<_>>();

                    if s.len() != 2 || s[0] == 0 || s[1] == 0 {
                        panic!("Argument error: size must be WxH, both nonzero");
                    }

                    (self.width, self.height) = (s[0], s[1]);
                }

                "--fps" => {
                    self.fps = args
                        .next()
                        .expect("Argument error: Expected value for fps.")
                        .parse::<u32>()
                        .expect("Argument error: Invalid value");
                }

                "--seed" => {
                    self.seed = Some(
                        args.next()
                            .expect("Argument error: Expected value for seed.")
                            .parse::<u64>()
                            .expect("Argument error: Invalid value"),
                    );
                }

                "--night" => self.night_mode = true,

                "--accent" => {
                    let hex = args
                        .next()
                        .expect("Argument error: Expected hex color for accent.");

                    self.accent = palette::parse_hex(&hex)
                        .expect("Argument error: Invalid hex color");
                }

                "--padding" => {
                    self.layout.padding = args
                        .next()
                        .expect("Argument error: Expected value for padding.")
                        .parse::<i32>()
                        .expect("Argument error: Invalid value");
                }

                "--min-radius" => {
                    self.layout.min_radius = args
                        .next()
                        .expect("Argument error: Expected value for min radius.")
                        .parse::<i32>()
                        .expect("Argument error: Invalid value");
                }

                "--max-radius" => {
                    self.layout.max_radius = args
                        .next()
                        .expect("Argument error: Expected value for max radius.")
                        .parse::<i32>()
                        .expect("Argument error: Invalid value");
                }

                &_ => eprintln!("Argument error: Unknown option {}", arg),
            }
        }

        if self.layout.min_radius <= 0 || self.layout.min_radius >= self.layout.max_radius {
            panic!("Argument error: need 0 < min radius < max radius");
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(args: &[&str]) -> Config {
        let mut iter = std::iter::once("bubblewall".to_string())
            .chain(args.iter().map(|s| s.to_string()));
        Config::default().eval_args(&mut iter)
    }

    #[test]
    fn parses_size_seed_and_theme() {
        let cfg = eval(&["--size", "1000x1000", "--seed", "42", "--night"]);
        assert_eq!((cfg.width, cfg.height), (1000, 1000));
        assert_eq!(cfg.seed, Some(42));
        assert!(cfg.night_mode);
    }

    #[test]
    fn parses_layout_overrides() {
        let cfg = eval(&["--padding", "10", "--min-radius", "5", "--max-radius", "40"]);
        assert_eq!(cfg.layout.padding, 10);
        assert_eq!(cfg.layout.min_radius, 5);
        assert_eq!(cfg.layout.max_radius, 40);
    }

    #[test]
    #[should_panic]
    fn rejects_inverted_radii() {
        eval(&["--min-radius", "50", "--max-radius", "10"]);
    }
}
