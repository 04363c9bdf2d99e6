pub mod blend;
pub mod draw;

/// Packed 0xAARRGGBB pixel, the only pixel format the engine renders in.
pub type Argb = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P2 {
    pub x: i32,
    pub y: i32,
}

impl P2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}
