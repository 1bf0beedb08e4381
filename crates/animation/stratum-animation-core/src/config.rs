//! Core configuration: user defaults applied when curves and keys are created.

use serde::{Deserialize, Serialize};

/// Smoothing applied to the handles of newly created curves.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoSmoothing {
    None,
    #[default]
    ContinuousAcceleration,
}

/// Semantic tag of a key; carried through evaluation untouched.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyframeType {
    #[default]
    Keyframe,
    Breakdown,
    MovingHold,
    Extreme,
    Jitter,
    Generated,
}

/// Interpolation from a key towards the next one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    Constant,
    Linear,
    #[default]
    Bezier,
}

/// How bezier tangents at a key are derived.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleType {
    Auto,
    #[default]
    AutoClamped,
    Vector,
}

/// Settings used by a single key insertion.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyframeSettings {
    pub keyframe_type: KeyframeType,
    pub interpolation: Interpolation,
    pub handle: HandleType,
    /// Applied to curves the insertion has to create.
    pub curve_smoothing: AutoSmoothing,
}

/// User-level defaults for key insertion.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auto_smoothing: AutoSmoothing,
    #[serde(default)]
    pub keyframe: KeyframeSettings,
}

impl Config {
    /// Settings for an interactive key insertion.
    ///
    /// `from_userprefs = false` gives the built-in defaults regardless of the
    /// stored preferences, which is what scripted insertion and tests use.
    pub fn keyframe_settings(&self, from_userprefs: bool) -> KeyframeSettings {
        if from_userprefs {
            KeyframeSettings {
                curve_smoothing: self.auto_smoothing,
                ..self.keyframe
            }
        } else {
            KeyframeSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn userprefs_carry_smoothing() {
        let cfg = Config {
            auto_smoothing: AutoSmoothing::None,
            keyframe: KeyframeSettings {
                interpolation: Interpolation::Linear,
                ..KeyframeSettings::default()
            },
        };
        let s = cfg.keyframe_settings(true);
        assert_eq!(s.interpolation, Interpolation::Linear);
        assert_eq!(s.curve_smoothing, AutoSmoothing::None);

        let d = cfg.keyframe_settings(false);
        assert_eq!(d, KeyframeSettings::default());
        assert_eq!(d.interpolation, Interpolation::Bezier);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.auto_smoothing, AutoSmoothing::ContinuousAcceleration);
        assert_eq!(cfg.keyframe.handle, HandleType::AutoClamped);
    }
}
