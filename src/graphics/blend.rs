use super::Argb;

/// Blend function plugged into the draw primitives.
pub type Mixer = fn(Argb, Argb) -> Argb;

pub fn u8_mul(a: u8, b: u8) -> u8 {
    (a as u16 * b as u16).to_be_bytes()[0]
}

pub fn decompose(c: Argb) -> [u8; 4] {
    c.to_be_bytes()
}

pub fn compose(array: [u8; 4]) -> Argb {
    Argb::from_be_bytes(array)
}

/// Replaces the destination pixel outright.
pub fn over(_dst: Argb, src: Argb) -> Argb {
    src
}

/// Source-over alpha compositing in integer space.
pub fn mix(dst: Argb, src: Argb) -> Argb {
    let [a1, r1, g1, b1] = decompose(dst);
    let [a2, r2, g2, b2] = decompose(src);

    let (a, a3) = {
        let a1 = a1 as u16;
        let a2 = a2 as u16;

        let a3 = (a1 * (255 - a2)) / 256;

        (a2 + a3, a3)
    };

    if a == 0 {
        return 0;
    }

    let composite_channel = |c1: u8, c2: u8| -> u8 {
        let c1 = c1 as u16;
        let c2 = c2 as u16;
        let a2 = a2 as u16;

        ((c2 * a2 + c1 * a3) / a) as u8
    };

    compose([
        a as u8,
        composite_channel(r1, r2),
        composite_channel(g1, g2),
        composite_channel(b1, b2),
    ])
}

/// Scales the alpha channel, leaving the color channels alone.
pub fn scale_alpha(c: Argb, factor: f32) -> Argb {
    let [a, r, g, b] = decompose(c);
    let a = (a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
    compose([a, r, g, b])
}

/// Opaque gray where 0.0 is black and 1.0 is white.
pub fn gray(brightness: f32) -> Argb {
    let v = (255.0 * brightness.clamp(0.0, 1.0)).round() as u8;
    compose([255, v, v, v])
}

/// Per-channel linear interpolation, `t` clamped to [0, 1].
pub fn lerp(a: Argb, b: Argb, t: f32) -> Argb {
    let t = t.clamp(0.0, 1.0);
    let ca = decompose(a);
    let cb = decompose(b);

    let mut out = [0u8; 4];
    for (o, (x, y)) in out.iter_mut().zip(ca.iter().zip(cb.iter())) {
        *o = (*x as f32 + (*y as f32 - *x as f32) * t).round() as u8;
    }
    compose(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_opaque_src_wins() {
        assert_eq!(mix(0xFF_10_20_30, 0xFF_AB_CD_EF), 0xFF_AB_CD_EF);
    }

    #[test]
    fn mix_transparent_src_keeps_dst() {
        let dst = 0xFF_10_20_30;
        let out = mix(dst, 0x00_FF_FF_FF);
        // Integer compositing may lose the lowest bit per channel.
        for (a, b) in decompose(out).iter().zip(decompose(dst).iter()) {
            assert!(a.abs_diff(*b) <= 1);
        }
    }

    #[test]
    fn scale_alpha_halves() {
        assert_eq!(scale_alpha(0xFF_12_34_56, 0.5), 0x80_12_34_56);
    }

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp(0xFF_00_00_00, 0xFF_FF_FF_FF, 0.0), 0xFF_00_00_00);
        assert_eq!(lerp(0xFF_00_00_00, 0xFF_FF_FF_FF, 1.0), 0xFF_FF_FF_FF);
    }
}
