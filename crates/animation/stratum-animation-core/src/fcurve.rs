//! F-curves: keyed scalar functions of time for one property component.
//!
//! Keys are kept sorted by time. Between two keys the left key's
//! interpolation applies; outside the keyed range the curve holds the
//! nearest key's value.
//!
//! Bezier segments are evaluated as cubic Hermite curves. Tangents are
//! derived from the key's handle type rather than stored:
//! - `Auto`: Catmull-Rom slope through the neighbouring keys
//! - `AutoClamped`: same, but flat at local extrema and at the curve ends
//! - `Vector`: slope of the segment itself

use serde::{Deserialize, Serialize};

use crate::config::{AutoSmoothing, HandleType, Interpolation, KeyframeSettings, KeyframeType};
use stratum_api_core::blend::lerp_f;

/// Keys closer than this (in frames) are treated as the same key.
const KEY_TIME_THRESHOLD: f32 = 1e-4;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FCurveFlags {
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub disabled: bool,
    /// Locked against editing; no keys can be inserted.
    #[serde(default)]
    pub protected: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default)]
    pub handle: HandleType,
    #[serde(default)]
    pub keyframe_type: KeyframeType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FCurve {
    pub rna_path: String,
    pub array_index: i32,
    #[serde(default)]
    pub flag: FCurveFlags,
    #[serde(default)]
    pub auto_smoothing: AutoSmoothing,
    #[serde(default)]
    keys: Vec<Keyframe>,
}

impl FCurve {
    pub fn new(rna_path: impl Into<String>, array_index: i32) -> Self {
        Self {
            rna_path: rna_path.into(),
            array_index,
            flag: FCurveFlags::default(),
            auto_smoothing: AutoSmoothing::default(),
            keys: Vec::new(),
        }
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Whether new keys may be added.
    pub fn is_keyable(&self) -> bool {
        !self.flag.protected && !self.flag.disabled
    }

    /// Whether evaluation should sample this curve at all.
    pub fn is_evaluatable(&self) -> bool {
        !self.flag.muted && !self.flag.disabled && !self.is_empty()
    }

    /// Insert a key, or replace the value of a key at (nearly) the same time.
    ///
    /// Returns the index of the affected key, or `None` when the key is
    /// rejected (non-finite time or value).
    pub fn insert_key(&mut self, time: f32, value: f32, settings: &KeyframeSettings) -> Option<usize> {
        if !time.is_finite() || !value.is_finite() {
            return None;
        }
        let key = Keyframe {
            time,
            value,
            interpolation: settings.interpolation,
            handle: settings.handle,
            keyframe_type: settings.keyframe_type,
        };
        let pos = self.keys.partition_point(|k| k.time < time - KEY_TIME_THRESHOLD);
        match self.keys.get_mut(pos) {
            Some(existing) if (existing.time - time).abs() <= KEY_TIME_THRESHOLD => {
                existing.value = value;
                existing.keyframe_type = settings.keyframe_type;
                Some(pos)
            }
            _ => {
                self.keys.insert(pos, key);
                Some(pos)
            }
        }
    }

    /// Sample the curve at `time`. An empty curve evaluates to 0.
    pub fn evaluate(&self, time: f32) -> f32 {
        let keys = &self.keys;
        let (first, last) = match (keys.first(), keys.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }
        // First key strictly after `time`; guaranteed in 1..len by the checks above.
        let right = keys.partition_point(|k| k.time <= time);
        let left = right - 1;
        let (k0, k1) = (&keys[left], &keys[right]);
        let span = (k1.time - k0.time).max(f32::EPSILON);
        let s = ((time - k0.time) / span).clamp(0.0, 1.0);

        match k0.interpolation {
            Interpolation::Constant => k0.value,
            Interpolation::Linear => lerp_f(k0.value, k1.value, s),
            Interpolation::Bezier => {
                let m0 = self.tangent(left, k0.handle);
                let m1 = self.tangent(right, k1.handle);
                hermite(k0.value, k1.value, m0 * span, m1 * span, s)
            }
        }
    }

    /// Slope (value per frame) at key `i`.
    fn tangent(&self, i: usize, handle: HandleType) -> f32 {
        let keys = &self.keys;
        let prev = i.checked_sub(1).and_then(|p| keys.get(p));
        let next = keys.get(i + 1);
        let cur = &keys[i];
        match handle {
            HandleType::Vector => {
                // Slope of the segment the tangent belongs to; ends are flat.
                match (prev, next) {
                    (_, Some(n)) => slope(cur, n),
                    (Some(p), None) => slope(p, cur),
                    (None, None) => 0.0,
                }
            }
            HandleType::Auto => match (prev, next) {
                (Some(p), Some(n)) => slope(p, n),
                (None, Some(n)) => slope(cur, n),
                (Some(p), None) => slope(p, cur),
                (None, None) => 0.0,
            },
            HandleType::AutoClamped => match (prev, next) {
                (Some(p), Some(n)) => {
                    let is_extremum = (cur.value >= p.value && cur.value >= n.value)
                        || (cur.value <= p.value && cur.value <= n.value);
                    if is_extremum {
                        0.0
                    } else {
                        slope(p, n)
                    }
                }
                _ => 0.0,
            },
        }
    }
}

fn slope(a: &Keyframe, b: &Keyframe) -> f32 {
    let dt = b.time - a.time;
    if dt.abs() <= f32::EPSILON {
        0.0
    } else {
        (b.value - a.value) / dt
    }
}

/// Cubic Hermite basis with tangents already scaled to the segment length.
#[inline]
fn hermite(p0: f32, p1: f32, m0: f32, m1: f32, s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
    let h10 = s3 - 2.0 * s2 + s;
    let h01 = -2.0 * s3 + 3.0 * s2;
    let h11 = s3 - s2;
    h00 * p0 + h10 * m0 + h01 * p1 + h11 * m1
}
