//! In-memory host object implementing [`AnimatedId`] and [`PropertyResolver`].
//!
//! Properties are float arrays keyed by path. A block may carry an
//! "original" counterpart, written when evaluation flushes to the original.

use crate::host::{AnimData, AnimatedId, PropertyResolver};

/// Resolved write location inside a [`DataBlock`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PropertyHandle {
    slot: usize,
    index: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataBlock {
    name: String,
    animatable: bool,
    anim_data: Option<AnimData>,
    properties: Vec<(String, Vec<f32>)>,
    original: Option<Box<DataBlock>>,
}

impl DataBlock {
    /// New block named with its type prefix, e.g. `OBCube`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animatable: true,
            ..Default::default()
        }
    }

    /// A block whose type cannot carry animation data.
    pub fn non_animatable(name: impl Into<String>) -> Self {
        Self {
            animatable: false,
            ..Self::new(name)
        }
    }

    pub fn with_property(mut self, rna_path: &str, values: &[f32]) -> Self {
        self.set_property(rna_path, values);
        self
    }

    pub fn property(&self, rna_path: &str) -> Option<&[f32]> {
        self.properties
            .iter()
            .find(|(path, _)| path == rna_path)
            .map(|(_, values)| values.as_slice())
    }

    pub fn property_value(&self, rna_path: &str, array_index: i32) -> Option<f32> {
        let index = usize::try_from(array_index).ok()?;
        self.property(rna_path)?.get(index).copied()
    }

    /// Create or replace a property.
    pub fn set_property(&mut self, rna_path: &str, values: &[f32]) {
        match self.properties.iter_mut().find(|(path, _)| path == rna_path) {
            Some((_, existing)) => *existing = values.to_vec(),
            None => self
                .properties
                .push((rna_path.to_string(), values.to_vec())),
        }
    }

    pub fn set_original(&mut self, original: DataBlock) {
        self.original = Some(Box::new(original));
    }

    pub fn original(&self) -> Option<&DataBlock> {
        self.original.as_deref()
    }
}

impl AnimatedId for DataBlock {
    fn name(&self) -> &str {
        &self.name
    }

    fn anim_data(&self) -> Option<&AnimData> {
        self.anim_data.as_ref()
    }

    fn anim_data_mut(&mut self) -> Option<&mut AnimData> {
        self.anim_data.as_mut()
    }

    fn ensure_anim_data(&mut self) -> Option<&mut AnimData> {
        if !self.animatable {
            return None;
        }
        Some(self.anim_data.get_or_insert_with(AnimData::default))
    }
}

impl PropertyResolver for DataBlock {
    type Handle = PropertyHandle;

    fn resolve(&self, rna_path: &str, array_index: i32) -> Option<PropertyHandle> {
        let index = usize::try_from(array_index).ok()?;
        let slot = self.properties.iter().position(|(path, _)| path == rna_path)?;
        (index < self.properties[slot].1.len()).then_some(PropertyHandle { slot, index })
    }

    fn write(&mut self, handle: &PropertyHandle, value: f32) {
        if let Some(target) = self
            .properties
            .get_mut(handle.slot)
            .and_then(|(_, values)| values.get_mut(handle.index))
        {
            *target = value;
        }
    }

    fn original_mut(&mut self) -> Option<&mut Self> {
        self.original.as_deref_mut()
    }
}
