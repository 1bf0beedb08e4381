//! Strips: time ranges within a layer, and the keyframe strip variant.

use log::warn;

use crate::channels::ChannelsForOutput;
use crate::config::KeyframeSettings;
use crate::error::KeyframeInsertError;
use crate::fcurve::FCurve;
use crate::ids::{OutputIndex, StripId};

/// Kind of strip to create with [`Layer::strip_add`](crate::Layer::strip_add).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StripType {
    Keyframe,
}

/// Variant-specific strip data.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum StripData {
    Keyframe(KeyframeStrip),
}

/// A closed frame range `[frame_start, frame_end]` contributing animation to
/// its layer. Only `frame_start` may be `-inf` and only `frame_end` `+inf`.
#[derive(Debug, PartialEq)]
pub struct Strip {
    id: StripId,
    frame_start: f32,
    frame_end: f32,
    /// Evaluation inside the strip happens at `time - frame_offset`.
    frame_offset: f32,
    data: StripData,
}

impl Strip {
    /// A strip of the given type covering all time, without offset.
    pub fn new(strip_type: StripType) -> Self {
        let data = match strip_type {
            StripType::Keyframe => StripData::Keyframe(KeyframeStrip::default()),
        };
        Self::from_parts(f32::NEG_INFINITY, f32::INFINITY, 0.0, data)
    }

    pub(crate) fn from_parts(frame_start: f32, frame_end: f32, frame_offset: f32, data: StripData) -> Self {
        Self {
            id: StripId::next(),
            frame_start,
            frame_end,
            frame_offset,
            data,
        }
    }

    #[inline]
    pub fn id(&self) -> StripId {
        self.id
    }

    pub fn strip_type(&self) -> StripType {
        match self.data {
            StripData::Keyframe(_) => StripType::Keyframe,
        }
    }

    #[inline]
    pub fn frame_start(&self) -> f32 {
        self.frame_start
    }

    #[inline]
    pub fn frame_end(&self) -> f32 {
        self.frame_end
    }

    #[inline]
    pub fn frame_offset(&self) -> f32 {
        self.frame_offset
    }

    pub fn set_frame_offset(&mut self, frame_offset: f32) {
        self.frame_offset = frame_offset;
    }

    /// Set the frame range. Panics when the range is inverted or when an
    /// infinity sits on the wrong end.
    pub fn resize(&mut self, frame_start: f32, frame_end: f32) {
        assert!(frame_start <= frame_end, "strip start {frame_start} after end {frame_end}");
        assert!(frame_start != f32::INFINITY, "only the strip end can be +inf");
        assert!(frame_end != f32::NEG_INFINITY, "only the strip start can be -inf");
        self.frame_start = frame_start;
        self.frame_end = frame_end;
    }

    #[inline]
    pub fn contains_frame(&self, frame_time: f32) -> bool {
        self.frame_start <= frame_time && frame_time <= self.frame_end
    }

    /// Exact comparison with the end frame.
    #[inline]
    pub fn is_last_frame(&self, frame_time: f32) -> bool {
        self.frame_end == frame_time
    }

    pub fn data(&self) -> &StripData {
        &self.data
    }

    pub fn as_keyframe(&self) -> Option<&KeyframeStrip> {
        match &self.data {
            StripData::Keyframe(key_strip) => Some(key_strip),
        }
    }

    pub fn as_keyframe_mut(&mut self) -> Option<&mut KeyframeStrip> {
        match &mut self.data {
            StripData::Keyframe(key_strip) => Some(key_strip),
        }
    }

    /// Deep copy with a fresh identity.
    pub fn duplicate(&self) -> Self {
        let data = match &self.data {
            StripData::Keyframe(key_strip) => StripData::Keyframe(key_strip.clone()),
        };
        Self::from_parts(self.frame_start, self.frame_end, self.frame_offset, data)
    }

    /// Insert a key into this strip, if it is a strip type that holds keys.
    pub fn keyframe_insert(
        &mut self,
        output: OutputIndex,
        rna_path: &str,
        array_index: i32,
        time_value: (f32, f32),
        settings: &KeyframeSettings,
    ) -> Result<&mut FCurve, KeyframeInsertError> {
        match &mut self.data {
            StripData::Keyframe(key_strip) => {
                key_strip.keyframe_insert(output, rna_path, array_index, time_value, settings)
            }
            #[allow(unreachable_patterns)]
            _ => {
                warn!("{}", KeyframeInsertError::WrongStripType);
                Err(KeyframeInsertError::WrongStripType)
            }
        }
    }
}

/// Strip holding keyed curves, grouped per output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyframeStrip {
    channels_for_output: Vec<ChannelsForOutput>,
}

impl KeyframeStrip {
    pub(crate) fn from_channels(channels_for_output: Vec<ChannelsForOutput>) -> Self {
        Self { channels_for_output }
    }

    pub fn channels_for_output(&self) -> &[ChannelsForOutput] {
        &self.channels_for_output
    }

    pub fn channels_for_output_mut(&mut self) -> &mut [ChannelsForOutput] {
        &mut self.channels_for_output
    }

    pub fn channels_for_output_at(&self, index: usize) -> Option<&ChannelsForOutput> {
        self.channels_for_output.get(index)
    }

    /// Channel group for the output, if one exists. Never creates one.
    pub fn chans_for_out(&self, output_index: OutputIndex) -> Option<&ChannelsForOutput> {
        self.channels_for_output
            .iter()
            .find(|chans| chans.output_stable_index == output_index)
    }

    fn chans_position(&self, output_index: OutputIndex) -> Option<usize> {
        self.channels_for_output
            .iter()
            .position(|chans| chans.output_stable_index == output_index)
    }

    /// Add a channel group for the output. There must not be one yet.
    pub fn chans_for_out_add(&mut self, output: OutputIndex) -> &mut ChannelsForOutput {
        debug_assert!(
            self.chans_for_out(output).is_none(),
            "Cannot add chans-for-out for already-registered output {output}"
        );
        self.channels_for_output.push(ChannelsForOutput::new(output));
        let last = self.channels_for_output.len() - 1;
        &mut self.channels_for_output[last]
    }

    /// Find the curve for `(rna_path, array_index)` in the output's group.
    pub fn fcurve_find(&self, output: OutputIndex, rna_path: &str, array_index: i32) -> Option<&FCurve> {
        self.chans_for_out(output)?
            .fcurve_find(rna_path, array_index)
    }

    /// Find the curve, creating it (and the output's group) when missing.
    pub fn fcurve_find_or_create(
        &mut self,
        output: OutputIndex,
        rna_path: &str,
        array_index: i32,
        settings: &KeyframeSettings,
    ) -> &mut FCurve {
        let chans_idx = match self.chans_position(output) {
            Some(idx) => idx,
            None => {
                self.chans_for_out_add(output);
                self.channels_for_output.len() - 1
            }
        };
        let chans = &mut self.channels_for_output[chans_idx];

        let fcurve_idx = match chans.fcurve_position(rna_path, array_index) {
            Some(idx) => idx,
            None => {
                let mut fcurve = FCurve::new(rna_path, array_index);
                fcurve.flag.visible = true;
                fcurve.flag.selected = true;
                fcurve.auto_smoothing = settings.curve_smoothing;
                // First curve is added active.
                fcurve.flag.active = chans.fcurves().is_empty();
                chans.push(fcurve)
            }
        };
        chans.fcurve_at_mut(fcurve_idx)
    }

    /// Insert a key at `time_value = (time, value)`, creating the curve and
    /// channel group as needed.
    ///
    /// Failures are reported through the log and returned. A failed insert
    /// leaves the strip as it was.
    pub fn keyframe_insert(
        &mut self,
        output: OutputIndex,
        rna_path: &str,
        array_index: i32,
        time_value: (f32, f32),
        settings: &KeyframeSettings,
    ) -> Result<&mut FCurve, KeyframeInsertError> {
        let (time, value) = time_value;
        let rejected = || KeyframeInsertError::Rejected {
            rna_path: rna_path.to_string(),
            array_index,
            output,
        };
        if !time.is_finite() || !value.is_finite() {
            let err = rejected();
            warn!("keyframe_insert: {err}");
            return Err(err);
        }

        if let Some(fcurve) = self.fcurve_find(output, rna_path, array_index) {
            if !fcurve.is_keyable() {
                let err = KeyframeInsertError::NotKeyable {
                    rna_path: rna_path.to_string(),
                    array_index,
                    output,
                };
                warn!("keyframe_insert: {err}");
                return Err(err);
            }
        }

        let fcurve = self.fcurve_find_or_create(output, rna_path, array_index, settings);
        if fcurve.insert_key(time, value, settings).is_none() {
            let err = rejected();
            warn!("keyframe_insert: {err}");
            return Err(err);
        }

        Ok(fcurve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_strip_is_infinite() {
        let strip = Strip::new(StripType::Keyframe);
        assert_eq!(strip.frame_start(), f32::NEG_INFINITY);
        assert_eq!(strip.frame_end(), f32::INFINITY);
        assert_eq!(strip.frame_offset(), 0.0);
        assert_eq!(strip.strip_type(), StripType::Keyframe);
    }

    #[test]
    fn infinite_strip_contains_everything() {
        let mut strip = Strip::new(StripType::Keyframe);
        strip.resize(f32::NEG_INFINITY, f32::INFINITY);
        assert!(strip.contains_frame(0.0));
        assert!(strip.contains_frame(-100000.0));
        assert!(strip.contains_frame(100000.0));
        assert!(strip.is_last_frame(f32::INFINITY));
    }

    #[test]
    fn finite_strip_boundaries() {
        let mut strip = Strip::new(StripType::Keyframe);
        strip.resize(1.0, 2.0);
        assert!(!strip.contains_frame(0.0));
        assert!(!strip.contains_frame(0.999999));
        assert!(strip.contains_frame(1.0));
        assert!(strip.contains_frame(2.0));
        assert!(!strip.contains_frame(2.000001));
        assert!(!strip.contains_frame(2.0001));

        assert!(!strip.is_last_frame(1.0));
        assert!(!strip.is_last_frame(1.5));
        assert!(!strip.is_last_frame(1.999999));
        assert!(strip.is_last_frame(2.0));
        assert!(!strip.is_last_frame(2.0001));
    }

    #[test]
    fn large_end_frame_uses_exact_comparison() {
        // 2 hours at 24 FPS.
        let mut strip = Strip::new(StripType::Keyframe);
        strip.resize(1.0, 172800.0);
        assert!(strip.contains_frame(172800.0));
        assert!(!strip.contains_frame(172800.1));

        assert!(!strip.is_last_frame(172799.925));
        assert!(strip.is_last_frame(172800.0));
        assert!(!strip.is_last_frame(172800.075));
    }

    #[test]
    #[should_panic]
    fn resize_rejects_inverted_range() {
        let mut strip = Strip::new(StripType::Keyframe);
        strip.resize(2.0, 1.0);
    }

    #[test]
    #[should_panic]
    fn resize_rejects_positive_infinite_start() {
        let mut strip = Strip::new(StripType::Keyframe);
        strip.resize(f32::INFINITY, f32::INFINITY);
    }

    #[test]
    fn duplicate_gets_fresh_identity() {
        let mut strip = Strip::new(StripType::Keyframe);
        strip.resize(3.0, 4.0);
        strip.set_frame_offset(1.5);
        let dup = strip.duplicate();
        assert_ne!(dup.id(), strip.id());
        assert_eq!(dup.frame_start(), 3.0);
        assert_eq!(dup.frame_end(), 4.0);
        assert_eq!(dup.frame_offset(), 1.5);
    }
}
