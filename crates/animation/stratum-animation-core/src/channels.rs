//! Channel groups: the curves one keyframe strip holds for one output.

use serde::{Deserialize, Serialize};

use crate::fcurve::FCurve;
use crate::ids::OutputIndex;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelsForOutput {
    pub output_stable_index: OutputIndex,
    fcurves: Vec<FCurve>,
}

impl ChannelsForOutput {
    pub fn new(output_stable_index: OutputIndex) -> Self {
        Self {
            output_stable_index,
            fcurves: Vec::new(),
        }
    }

    pub(crate) fn from_parts(output_stable_index: OutputIndex, fcurves: Vec<FCurve>) -> Self {
        Self {
            output_stable_index,
            fcurves,
        }
    }

    pub fn fcurves(&self) -> &[FCurve] {
        &self.fcurves
    }

    pub fn fcurves_mut(&mut self) -> &mut [FCurve] {
        &mut self.fcurves
    }

    pub fn fcurve_find(&self, rna_path: &str, array_index: i32) -> Option<&FCurve> {
        self.fcurves
            .iter()
            .find(|fcu| fcu.array_index == array_index && fcu.rna_path == rna_path)
    }

    pub(crate) fn fcurve_position(&self, rna_path: &str, array_index: i32) -> Option<usize> {
        self.fcurves
            .iter()
            .position(|fcu| fcu.array_index == array_index && fcu.rna_path == rna_path)
    }

    /// Append a curve and return its position. The caller guarantees the
    /// `(rna_path, array_index)` pair is not present yet.
    pub(crate) fn push(&mut self, fcurve: FCurve) -> usize {
        debug_assert!(
            self.fcurve_find(&fcurve.rna_path, fcurve.array_index).is_none(),
            "duplicate FCurve {}[{}]",
            fcurve.rna_path,
            fcurve.array_index
        );
        self.fcurves.push(fcurve);
        self.fcurves.len() - 1
    }

    pub(crate) fn fcurve_at_mut(&mut self, index: usize) -> &mut FCurve {
        &mut self.fcurves[index]
    }
}
