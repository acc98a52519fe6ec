//! Order-independent attribute derivation from a seed and a string key.
//!
//! Every per-leaf visual attribute goes through [`attribute_hash`], so the
//! result for a leaf depends only on `(seed, key)` and never on how many
//! other leaves were drawn before it.

use crate::{color::Color, types::Seed};

/// Polynomial string hash over UTF-16 code units, `h = c + ((h << 5) - h)`.
///
/// Only the shift is truncated to 32 bits; the running sum is kept wide, so
/// `h` can leave the `i32` range. Each step grows `|h|` by less than 2^32,
/// which keeps any realistic key far inside `i64`.
fn fold_key(input: &str) -> i64 {
    input.encode_utf16().fold(0i64, |h, c| {
        let shifted = (h as i32).wrapping_shl(5) as i64;
        c as i64 + shifted - h
    })
}

/// Returns a value in [0,1) that depends only on `seed` and `key`.
///
/// Resolution is 1/1000.
pub fn attribute_hash(seed: Seed, key: &str) -> f32 {
    let h = fold_key(&format!("{seed}-{key}"));
    (h.unsigned_abs() % 1000) as f32 / 1000.0
}

/// Stable two-way classification (left/right, front/behind).
pub fn attribute_bool(seed: Seed, key: &str) -> bool {
    attribute_hash(seed, key) >= 0.5
}

/// Picks a palette entry for `identifier`.
///
/// `palette` must be non-empty.
pub fn pick_color(seed: Seed, identifier: &str, palette: &[Color]) -> Color {
    let r = attribute_hash(seed, &format!("{identifier}-color"));
    let index = ((r * palette.len() as f32) as usize).min(palette.len() - 1);
    palette[index]
}
