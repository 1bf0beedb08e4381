//! JSON persistence for [`Animation`].
//!
//! Every owned array is written size-prefixed as `{ "num": n, "items": [..] }`.
//! Reading stages each array, checks the count against `num`, then rebuilds
//! the owning `Vec` from the staging list. Runtime state (ids, user counts) is
//! not persisted.
//!
//! Infinite strip bounds are written as the strings `"+inf"` / `"-inf"`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::animation::Animation;
use crate::channels::ChannelsForOutput;
use crate::error::StorageError;
use crate::fcurve::FCurve;
use crate::ids::OutputIndex;
use crate::layer::Layer;
use crate::output::Output;
use crate::strip::{KeyframeStrip, Strip, StripData};
use stratum_api_core::MixMode;

const FORMAT_VERSION: u32 = 1;

/// Size-prefixed array as written to disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct SizedArray<T> {
    num: usize,
    items: Vec<T>,
}

impl<T> From<Vec<T>> for SizedArray<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            num: items.len(),
            items,
        }
    }
}

/// Items read from disk, waiting to be moved into their owning array.
#[derive(Debug)]
pub(crate) struct StagingList<T> {
    items: VecDeque<T>,
}

impl<T: Clone> StagingList<T> {
    fn from_sized(container: &'static str, array: SizedArray<T>) -> Result<Self, StorageError> {
        let staging = Self {
            items: array.items.into_iter().collect(),
        };
        if staging.count() != array.num {
            return Err(StorageError::CountMismatch {
                container,
                expected: array.num,
                actual: staging.count(),
            });
        }
        Ok(staging)
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    /// Replace the contents of `array` with the staged items, in order.
    fn rebuild(&self, array: &mut Vec<T>) {
        array.clear();
        array.reserve(self.items.len());
        array.extend(self.items.iter().cloned());
    }
}

fn unstage<T: Clone>(container: &'static str, array: SizedArray<T>) -> Result<Vec<T>, StorageError> {
    let staging = StagingList::from_sized(container, array)?;
    let mut items = Vec::new();
    staging.rebuild(&mut items);
    Ok(items)
}

// ----- JSON schema (serde) -----

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredAnimation {
    version: u32,
    #[serde(default)]
    layer_active_index: Option<usize>,
    last_output_stable_index: i32,
    layers: SizedArray<StoredLayer>,
    outputs: SizedArray<Output>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredLayer {
    name: String,
    influence: f32,
    #[serde(default)]
    mix_mode: MixMode,
    strips: SizedArray<StoredStrip>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredStrip {
    #[serde(with = "frame")]
    frame_start: f32,
    #[serde(with = "frame")]
    frame_end: f32,
    #[serde(default)]
    frame_offset: f32,
    data: StoredStripData,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StoredStripData {
    Keyframe {
        channels_for_output: SizedArray<StoredChannels>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredChannels {
    output_stable_index: OutputIndex,
    fcurves: SizedArray<FCurve>,
}

/// Frame numbers that may be infinite.
mod frame {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f32::INFINITY {
            serializer.serialize_str("+inf")
        } else if *value == f32::NEG_INFINITY {
            serializer.serialize_str("-inf")
        } else {
            serializer.serialize_f32(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFrame {
        Number(f32),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        match RawFrame::deserialize(deserializer)? {
            RawFrame::Number(n) => Ok(n),
            RawFrame::Text(s) => match s.as_str() {
                "+inf" | "inf" => Ok(f32::INFINITY),
                "-inf" => Ok(f32::NEG_INFINITY),
                other => Err(de::Error::custom(format!("invalid frame '{other}'"))),
            },
        }
    }
}

// ----- write -----

/// Serialize an animation to JSON.
pub fn write_animation_json(animation: &Animation) -> Result<String, StorageError> {
    let stored = StoredAnimation {
        version: FORMAT_VERSION,
        layer_active_index: animation.layer_active_index(),
        last_output_stable_index: animation.last_output_stable_index(),
        layers: animation
            .layers()
            .iter()
            .map(store_layer)
            .collect::<Vec<_>>()
            .into(),
        outputs: animation.outputs().to_vec().into(),
    };
    Ok(serde_json::to_string_pretty(&stored)?)
}

fn store_layer(layer: &Layer) -> StoredLayer {
    StoredLayer {
        name: layer.name.clone(),
        influence: layer.influence(),
        mix_mode: layer.mix_mode,
        strips: layer
            .strips()
            .iter()
            .map(store_strip)
            .collect::<Vec<_>>()
            .into(),
    }
}

fn store_strip(strip: &Strip) -> StoredStrip {
    let data = match strip.data() {
        StripData::Keyframe(key_strip) => StoredStripData::Keyframe {
            channels_for_output: key_strip
                .channels_for_output()
                .iter()
                .map(|chans| StoredChannels {
                    output_stable_index: chans.output_stable_index,
                    fcurves: chans.fcurves().to_vec().into(),
                })
                .collect::<Vec<_>>()
                .into(),
        },
    };
    StoredStrip {
        frame_start: strip.frame_start(),
        frame_end: strip.frame_end(),
        frame_offset: strip.frame_offset(),
        data,
    }
}

// ----- read -----

/// Parse an animation from JSON written by [`write_animation_json`].
///
/// The result has a fresh id and no users.
pub fn read_animation_json(s: &str) -> Result<Animation, StorageError> {
    let stored: StoredAnimation = serde_json::from_str(s)?;
    if stored.version > FORMAT_VERSION {
        return Err(StorageError::Invalid(format!(
            "unsupported format version {}",
            stored.version
        )));
    }

    let outputs = unstage("outputs", stored.outputs)?;
    validate_outputs(&outputs, stored.last_output_stable_index)?;

    let mut layers = Vec::new();
    for stored_layer in unstage("layers", stored.layers)? {
        layers.push(read_layer(stored_layer)?);
    }

    if let Some(active) = stored.layer_active_index {
        if active >= layers.len() {
            return Err(StorageError::Invalid(format!(
                "active layer {active} out of range ({} layers)",
                layers.len()
            )));
        }
    }

    Ok(Animation::from_parts(
        layers,
        stored.layer_active_index,
        outputs,
        stored.last_output_stable_index,
    ))
}

fn read_layer(stored: StoredLayer) -> Result<Layer, StorageError> {
    if !(0.0..=1.0).contains(&stored.influence) {
        return Err(StorageError::Invalid(format!(
            "layer '{}': influence {} outside [0, 1]",
            stored.name, stored.influence
        )));
    }

    let mut strips = Vec::new();
    for stored_strip in unstage("strips", stored.strips)? {
        strips.push(read_strip(stored_strip)?);
    }
    Ok(Layer::from_parts(
        stored.name,
        stored.influence,
        stored.mix_mode,
        strips,
    ))
}

fn read_strip(stored: StoredStrip) -> Result<Strip, StorageError> {
    let (start, end) = (stored.frame_start, stored.frame_end);
    if start.is_nan()
        || end.is_nan()
        || start > end
        || start == f32::INFINITY
        || end == f32::NEG_INFINITY
    {
        return Err(StorageError::Invalid(format!(
            "strip range [{start}, {end}] is not valid"
        )));
    }
    if !stored.frame_offset.is_finite() {
        return Err(StorageError::Invalid(format!(
            "strip frame offset {} is not finite",
            stored.frame_offset
        )));
    }

    let data = match stored.data {
        StoredStripData::Keyframe {
            channels_for_output,
        } => {
            let mut groups: Vec<ChannelsForOutput> = Vec::new();
            for stored_chans in unstage("channels_for_output", channels_for_output)? {
                let output = stored_chans.output_stable_index;
                if groups.iter().any(|g| g.output_stable_index == output) {
                    return Err(StorageError::Invalid(format!(
                        "two channel groups for output {output}"
                    )));
                }
                let fcurves = unstage("fcurves", stored_chans.fcurves)?;
                validate_fcurves(&fcurves)?;
                groups.push(ChannelsForOutput::from_parts(output, fcurves));
            }
            StripData::Keyframe(KeyframeStrip::from_channels(groups))
        }
    };
    Ok(Strip::from_parts(start, end, stored.frame_offset, data))
}

fn validate_outputs(outputs: &[Output], last_output_stable_index: i32) -> Result<(), StorageError> {
    for (i, output) in outputs.iter().enumerate() {
        let index = output.stable_index();
        if index.0 <= 0 || index.0 > last_output_stable_index {
            return Err(StorageError::Invalid(format!(
                "output stable index {index} outside 1..={last_output_stable_index}"
            )));
        }
        let earlier = &outputs[..i];
        if earlier.iter().any(|o| o.stable_index() == index) {
            return Err(StorageError::Invalid(format!(
                "duplicate output stable index {index}"
            )));
        }
        if !output.name().is_empty() && earlier.iter().any(|o| o.name() == output.name()) {
            return Err(StorageError::Invalid(format!(
                "duplicate output name '{}'",
                output.name()
            )));
        }
    }
    Ok(())
}

fn validate_fcurves(fcurves: &[FCurve]) -> Result<(), StorageError> {
    for (i, fcurve) in fcurves.iter().enumerate() {
        if fcurves[..i]
            .iter()
            .any(|f| f.array_index == fcurve.array_index && f.rna_path == fcurve.rna_path)
        {
            return Err(StorageError::Invalid(format!(
                "duplicate curve {}[{}]",
                fcurve.rna_path, fcurve.array_index
            )));
        }
        let keys = fcurve.keys();
        let finite = keys
            .iter()
            .all(|k| k.time.is_finite() && k.value.is_finite());
        let sorted = keys.windows(2).all(|w| w[0].time < w[1].time);
        if !finite || !sorted {
            return Err(StorageError::Invalid(format!(
                "curve {}[{}]: keys must be finite and strictly increasing in time",
                fcurve.rna_path, fcurve.array_index
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_count_must_match() {
        let array = SizedArray {
            num: 3,
            items: vec![1, 2],
        };
        let err = StagingList::from_sized("layers", array).unwrap_err();
        assert!(matches!(
            err,
            StorageError::CountMismatch {
                container: "layers",
                expected: 3,
                actual: 2
            }
        ));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let staging = StagingList::from_sized("outputs", SizedArray::from(vec![4, 5, 6])).unwrap();
        let mut array = vec![1];
        staging.rebuild(&mut array);
        staging.rebuild(&mut array);
        assert_eq!(array, vec![4, 5, 6]);
    }

    #[test]
    fn infinite_frames_round_trip_as_strings() {
        let strip = StoredStrip {
            frame_start: f32::NEG_INFINITY,
            frame_end: f32::INFINITY,
            frame_offset: 0.0,
            data: StoredStripData::Keyframe {
                channels_for_output: SizedArray::from(Vec::new()),
            },
        };
        let json = serde_json::to_string(&strip).unwrap();
        assert!(json.contains("\"-inf\""));
        assert!(json.contains("\"+inf\""));

        let back: StoredStrip = serde_json::from_str(&json).unwrap();
        assert_eq!(back.frame_start, f32::NEG_INFINITY);
        assert_eq!(back.frame_end, f32::INFINITY);
    }
}
