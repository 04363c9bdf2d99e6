//! The bubble color palette: a flat list of hex colors where even entries
//! are outlines and each is followed by its fill. Pairs are handed out
//! round-robin so every pair gets used before any repeats.

use anyhow::{bail, ensure, Context, Result};

use crate::graphics::Argb;

/// Built-in outline/fill pairs, one hue per pair.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#1a73e8", "#8ab4f8", // blue
    "#188038", "#81c995", // green
    "#d93025", "#f28b82", // red
    "#e37400", "#fdd663", // amber
    "#9334e6", "#d7aefb", // purple
    "#007b83", "#78d9ec", // teal
];

pub struct Palette {
    pairs: Vec<(Argb, Argb)>,
    cursor: usize,
}

impl Palette {
    /// Validates and parses the palette. An odd or empty entry list is a
    /// configuration error and fails fast.
    pub fn from_hex<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        ensure!(!entries.is_empty(), "palette is empty");
        ensure!(
            entries.len() % 2 == 0,
            "palette needs outline/fill pairs, got {} entries",
            entries.len()
        );

        let mut pairs = Vec::with_capacity(entries.len() / 2);
        for pair in entries.chunks_exact(2) {
            let outline = parse_hex(pair[0].as_ref())
                .with_context(|| format!("bad outline color {:?}", pair[0].as_ref()))?;
            let fill = parse_hex(pair[1].as_ref())
                .with_context(|| format!("bad fill color {:?}", pair[1].as_ref()))?;
            pairs.push((outline, fill));
        }

        Ok(Self { pairs, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Next (outline, fill) pair, wrapping to the start when exhausted.
    pub fn next_pair(&mut self) -> (Argb, Argb) {
        let pair = self.pairs[self.cursor];
        self.cursor = (self.cursor + 1) % self.pairs.len();
        pair
    }
}

/// Parses `#RRGGBB` or `#AARRGGBB` (leading `#` optional) into packed ARGB.
/// Colors without an alpha component come out opaque.
pub fn parse_hex(s: &str) -> Result<Argb> {
    let digits = s.strip_prefix('#').unwrap_or(s);

    let value = Argb::from_str_radix(digits, 16)?;
    match digits.len() {
        6 => Ok(value | 0xFF_00_00_00),
        8 => Ok(value),
        n => bail!("expected 6 or 8 hex digits, got {n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_argb() {
        assert_eq!(parse_hex("#1a73e8").unwrap(), 0xFF_1A_73_E8);
        assert_eq!(parse_hex("8033b5e5").unwrap(), 0x80_33_B5_E5);
        assert!(parse_hex("#123").is_err());
        assert!(parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn rejects_odd_or_empty() {
        assert!(Palette::from_hex::<&str>(&[]).is_err());
        assert!(Palette::from_hex(&["#111111", "#222222", "#333333"]).is_err());
    }

    #[test]
    fn round_robin_consumes_every_pair_before_repeating() {
        let mut palette = Palette::from_hex(DEFAULT_PALETTE).unwrap();
        let n = palette.len();

        let first_round: Vec<_> = (0..n).map(|_| palette.next_pair()).collect();

        let mut seen = first_round.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), n, "pairs repeated before the palette wrapped");

        // Second round replays the same sequence.
        for &pair in &first_round {
            assert_eq!(palette.next_pair(), pair);
        }
    }
}
