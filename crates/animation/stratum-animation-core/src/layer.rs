//! Layers: ordered strips plus the parameters used to blend them onto the
//! layers below.

use log::debug;

use crate::ids::{LayerId, StripId};
use crate::strip::{Strip, StripType};
use stratum_api_core::MixMode;

#[derive(Debug, PartialEq)]
pub struct Layer {
    id: LayerId,
    /// Not required to be unique.
    pub name: String,
    influence: f32,
    pub mix_mode: MixMode,
    strips: Vec<Strip>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_parts(name.into(), 1.0, MixMode::default(), Vec::new())
    }

    pub(crate) fn from_parts(name: String, influence: f32, mix_mode: MixMode, strips: Vec<Strip>) -> Self {
        Self {
            id: LayerId::next(),
            name,
            influence,
            mix_mode,
            strips,
        }
    }

    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    #[inline]
    pub fn influence(&self) -> f32 {
        self.influence
    }

    /// Set the influence, clamped to `[0, 1]`.
    pub fn set_influence(&mut self, influence: f32) {
        self.influence = influence.clamp(0.0, 1.0);
    }

    pub fn strips(&self) -> &[Strip] {
        &self.strips
    }

    pub fn strips_mut(&mut self) -> &mut [Strip] {
        &mut self.strips
    }

    pub fn strip(&self, index: usize) -> Option<&Strip> {
        self.strips.get(index)
    }

    pub fn strip_mut(&mut self, index: usize) -> Option<&mut Strip> {
        self.strips.get_mut(index)
    }

    /// Append a new strip of the given type with its default range.
    pub fn strip_add(&mut self, strip_type: StripType) -> &mut Strip {
        let strip = Strip::new(strip_type);
        debug!("layer '{}': add {:?} strip {:?}", self.name, strip_type, strip.id());
        self.strips.push(strip);
        let last = self.strips.len() - 1;
        &mut self.strips[last]
    }

    /// Remove and free the strip. Returns false, without touching anything,
    /// when the strip is not owned by this layer.
    pub fn strip_remove(&mut self, strip: StripId) -> bool {
        let Some(index) = self.strips.iter().position(|s| s.id() == strip) else {
            return false;
        };
        self.strips.remove(index);
        debug!("layer '{}': removed strip {:?}", self.name, strip);
        true
    }

    /// Deep copy with fresh layer and strip identities.
    pub fn duplicate(&self) -> Self {
        Self::from_parts(
            self.name.clone(),
            self.influence,
            self.mix_mode,
            self.strips.iter().map(Strip::duplicate).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_layer_defaults() {
        let layer = Layer::new("layer name");
        assert_eq!(layer.name, "layer name");
        assert_eq!(layer.influence(), 1.0);
        assert_eq!(layer.mix_mode, MixMode::Override);
        assert!(layer.strips().is_empty());
    }

    #[test]
    fn influence_is_clamped() {
        let mut layer = Layer::new("L");
        layer.set_influence(1.5);
        assert_eq!(layer.influence(), 1.0);
        layer.set_influence(-0.5);
        assert_eq!(layer.influence(), 0.0);
        layer.set_influence(0.25);
        assert_eq!(layer.influence(), 0.25);
    }

    #[test]
    fn add_strips_in_order() {
        let mut layer = Layer::new("Test Læür");
        let first = layer.strip_add(StripType::Keyframe).id();
        let second = layer.strip_add(StripType::Keyframe).id();
        assert_eq!(layer.strips().len(), 2);
        assert_eq!(layer.strip(0).map(Strip::id), Some(first));
        assert_eq!(layer.strip(1).map(Strip::id), Some(second));
        for strip in layer.strips() {
            assert_eq!(strip.frame_start(), f32::NEG_INFINITY);
            assert_eq!(strip.frame_end(), f32::INFINITY);
            assert_eq!(strip.frame_offset(), 0.0);
        }
    }

    #[test]
    fn remove_strips_compacts() {
        let mut layer = Layer::new("Test Læür");
        let s0 = layer.strip_add(StripType::Keyframe).id();
        let s1 = layer.strip_add(StripType::Keyframe).id();
        let s2 = layer.strip_add(StripType::Keyframe).id();

        assert!(layer.strip_remove(s1));
        let ids: Vec<StripId> = layer.strips().iter().map(Strip::id).collect();
        assert_eq!(ids, vec![s0, s2]);

        assert!(layer.strip_remove(s2));
        assert_eq!(layer.strips().len(), 1);
        assert!(layer.strip_remove(s0));
        assert!(layer.strips().is_empty());
    }

    #[test]
    fn removing_foreign_strip_is_rejected() {
        let mut layer = Layer::new("Test Læür");
        let own = layer.strip_add(StripType::Keyframe).id();
        let mut other_layer = Layer::new("Another Layer");
        let foreign = other_layer.strip_add(StripType::Keyframe).id();

        assert!(!layer.strip_remove(foreign));
        assert_eq!(layer.strips().len(), 1);
        assert_eq!(layer.strips()[0].id(), own);
        assert_eq!(other_layer.strips().len(), 1);
    }
}
