//! Per-face and per-vertex attribute encodings
//!
//! Colours are packed as 16-bit HSV (6 bits hue, 3 bits saturation,
//! 7 bits value). Alpha is stored inverted, and vertex skins store the
//! summed blend weight in hundredths.

#![allow(clippy::float_cmp)]

/// Largest stored vertex skin value.
pub const MAX_VERTEX_SKIN: u8 = 254;

/// Blend channels below this weight are dropped on decode.
pub const SKIN_EPSILON: f64 = 0.001;

/// Convert RGB in `0..=1` to HSV, each in `0..=1`.
pub fn rgb_to_hsv([r, g, b]: [f64; 3]) -> [f64; 3] {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == min {
        return [0.0, 0.0, max];
    }
    let range = max - min;
    let s = range / max;
    let rc = (max - r) / range;
    let gc = (max - g) / range;
    let bc = (max - b) / range;
    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    [(h / 6.0).rem_euclid(1.0), s, max]
}

/// Convert HSV in `0..=1` back to RGB.
pub fn hsv_to_rgb([h, s, v]: [f64; 3]) -> [f64; 3] {
    if s == 0.0 {
        return [v, v, v];
    }
    let sector = (h * 6.0).trunc();
    let f = h * 6.0 - sector;
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

/// Pack an RGB colour into the 16-bit HSL face colour.
pub fn pack_hsl(rgb: [f64; 3]) -> u16 {
    let [h, s, v] = rgb_to_hsv(rgb.map(|c| c.clamp(0.0, 1.0)));
    let h = (h * 63.0).round_ties_even() as u16;
    let s = (s * 7.0).round_ties_even() as u16;
    let v = (v * 127.0).round_ties_even() as u16;
    (h << 10) | (s << 7) | v
}

/// Unpack a 16-bit HSL face colour to RGB.
///
/// `0` is the "no colour" value and unpacks to mid grey.
pub fn unpack_hsl(packed: u16) -> [f64; 3] {
    if packed == 0 {
        return [0.5, 0.5, 0.5];
    }
    let h = f64::from((packed >> 10) & 0x3F) / 63.0;
    let s = f64::from((packed >> 7) & 0x07) / 7.0;
    let v = f64::from(packed & 0x7F) / 127.0;
    if s < 1e-6 {
        return [v, v, v];
    }
    hsv_to_rgb([h, s, v])
}

/// Encode an opacity in `0..=1` as the stored alpha byte.
pub fn encode_alpha(alpha: f64) -> u8 {
    ((1.0 - alpha.clamp(0.0, 1.0)) * 255.0).round_ties_even() as u8
}

/// Decode a stored alpha byte to an opacity.
pub fn decode_alpha(stored: u8) -> f64 {
    f64::from(255 - stored) / 255.0
}

/// Encode a summed blend weight (1.0 per full channel) as a vertex skin byte.
pub fn encode_vertex_skin(summed_weight: f64) -> u8 {
    (summed_weight * 100.0)
        .round_ties_even()
        .clamp(0.0, f64::from(MAX_VERTEX_SKIN)) as u8
}

/// Split a vertex skin byte into up to three blend channels.
///
/// Channel `n` carries at most `1.0`; channels at or below
/// [`SKIN_EPSILON`] are omitted.
pub fn decode_vertex_skin(stored: u8) -> Vec<f64> {
    let total = f64::from(stored) / 100.0;
    let w1 = total.min(1.0);
    let w2 = (total - w1).min(1.0);
    let w3 = total - w1 - w2;
    [w1, w2, w3]
        .into_iter()
        .filter(|w| *w > SKIN_EPSILON)
        .collect()
}

/// Number of blend channels needed for a set of vertex skins.
pub fn skin_channel_count(skins: &[u8]) -> usize {
    let max = f64::from(skins.iter().copied().max().unwrap_or(0)) / 100.0;
    if max > 2.0 {
        3
    } else if max > 1.0 {
        2
    } else if max > 0.0 {
        1
    } else {
        0
    }
}
