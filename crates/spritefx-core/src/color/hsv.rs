//! RGB ↔ HSV conversion.
//!
//! All math is done in `f64` on unit-range channels. 8-bit values enter as
//! `c / 255` and leave as `round(c × 255)`, which makes the round trip exact
//! for every 8-bit triple in practice and within ±1 by construction.

/// A color in hue/saturation/value form.
///
/// `h` is a fraction of a full turn in `[0, 1)`; `s` and `v` are in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    /// Convert an 8-bit RGB triple.
    #[inline]
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        rgb_to_hsv(
            rgb[0] as f64 / 255.0,
            rgb[1] as f64 / 255.0,
            rgb[2] as f64 / 255.0,
        )
    }

    /// Convert back to an 8-bit RGB triple, rounding to nearest.
    #[inline]
    pub fn to_rgb8(self) -> [u8; 3] {
        let [r, g, b] = hsv_to_rgb(self.h, self.s, self.v);
        [unit_to_u8(r), unit_to_u8(g), unit_to_u8(b)]
    }
}

/// Convert unit-range RGB to HSV.
///
/// ```text
/// V = max(r, g, b)
/// S = (V − min) / V        (0 when V = 0)
/// H = sector formula on the argmax channel, / 6, wrapped into [0, 1)
/// ```
///
/// Achromatic inputs (`max == min`) get `h = 0`.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> Hsv {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let v = max;
    if max == min {
        return Hsv { h: 0.0, s: 0.0, v };
    }

    let delta = max - min;
    let s = delta / max;

    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;

    let sector = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    let h = (sector / 6.0).rem_euclid(1.0);
    // rem_euclid can round a tiny negative up to exactly 1.0.
    let h = if h >= 1.0 { 0.0 } else { h };

    Hsv { h, s, v }
}

/// Convert HSV to unit-range RGB.
///
/// Any finite `h` is accepted and wrapped modulo one turn, so `h = 1.0`
/// behaves like `h = 0.0`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }

    let h6 = h.rem_euclid(1.0) * 6.0;
    let sector = h6.floor();
    let f = h6 - sector;

    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i64).rem_euclid(6) {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

#[inline]
fn unit_to_u8(c: f64) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}
