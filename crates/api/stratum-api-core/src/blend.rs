//! Mix-mode arithmetic used when a layer is blended onto the accumulated
//! result of the layers below it.
//!
//! All functions work on scalar property components; vector-valued
//! properties are animated per array index and blended component-wise.

use serde::{Deserialize, Serialize};

/// How a layer combines its value with the accumulated value of prior layers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixMode {
    /// Replace the previous value with `current * influence`.
    #[default]
    Override,
    /// Interpolate from the previous value towards the current one by `influence`.
    Combine,
    /// `previous + current * influence`
    Add,
    /// `previous - current * influence`
    Subtract,
    /// `previous * (current * influence)`
    Multiply,
}

/// Linear interpolation for f32
#[inline]
pub fn lerp_f(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Combine `previous` and `current` according to `mode`, weighted by `influence`.
#[inline]
pub fn mix_values(previous: f32, current: f32, mode: MixMode, influence: f32) -> f32 {
    match mode {
        MixMode::Override => current * influence,
        MixMode::Combine => lerp_f(previous, current, influence),
        MixMode::Add => previous + current * influence,
        MixMode::Subtract => previous - current * influence,
        MixMode::Multiply => previous * (current * influence),
    }
}
