//! The Animation aggregate: layers, outputs, and the binding between outputs
//! and animated objects.
//!
//! Objects are bound through their own [`AnimData`](crate::AnimData) side-table
//! (animation id, output stable index, output name); the animation only keeps
//! a user count. The output → objects direction is derived by scanning
//! side-tables, see [`Animation::output_users`].

use log::debug;

use crate::error::AssignError;
use crate::fcurve::FCurve;
use crate::host::AnimatedId;
use crate::ids::{AnimId, LayerId, OutputIndex};
use crate::layer::Layer;
use crate::naming::unique_name;
use crate::output::Output;

#[derive(Debug)]
pub struct Animation {
    id: AnimId,
    layers: Vec<Layer>,
    layer_active_index: Option<usize>,
    outputs: Vec<Output>,
    last_output_stable_index: i32,
    users: u32,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new()
    }
}

impl Animation {
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), None, Vec::new(), 0)
    }

    pub(crate) fn from_parts(
        layers: Vec<Layer>,
        layer_active_index: Option<usize>,
        outputs: Vec<Output>,
        last_output_stable_index: i32,
    ) -> Self {
        Self {
            id: AnimId::next(),
            layers,
            layer_active_index,
            outputs,
            last_output_stable_index,
            users: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> AnimId {
        self.id
    }

    /// Number of objects this animation is assigned to.
    #[inline]
    pub fn users(&self) -> u32 {
        self.users
    }

    #[inline]
    pub fn last_output_stable_index(&self) -> i32 {
        self.last_output_stable_index
    }

    /* Layers. */

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn layer_by_id_mut(&mut self, layer: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == layer)
    }

    pub fn layer_active_index(&self) -> Option<usize> {
        self.layer_active_index
    }

    pub fn layer_active(&self) -> Option<&Layer> {
        self.layer_active_index.and_then(|idx| self.layers.get(idx))
    }

    /// Append a layer with default influence; it becomes the active layer.
    pub fn layer_add(&mut self, name: &str) -> &mut Layer {
        let layer = Layer::new(name);
        debug!("animation {:?}: add layer '{}' {:?}", self.id, name, layer.id());
        self.layers.push(layer);
        let last = self.layers.len() - 1;
        self.layer_active_index = Some(last);
        &mut self.layers[last]
    }

    /// Remove and free the layer with all its strips. Returns false, without
    /// touching anything, when the layer is not owned by this animation.
    pub fn layer_remove(&mut self, layer: LayerId) -> bool {
        let Some(index) = self.layers.iter().position(|l| l.id() == layer) else {
            return false;
        };
        self.layers.remove(index);

        self.layer_active_index = match self.layer_active_index {
            _ if self.layers.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) => Some(active.min(self.layers.len() - 1)),
            None => None,
        };
        debug!("animation {:?}: removed layer {:?}", self.id, layer);
        true
    }

    /* Outputs. */

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    /// Create an output with the next stable index. It is not assigned to
    /// anything and has no name yet.
    ///
    /// Panics when the stable index counter would overflow.
    pub fn output_add(&mut self) -> &mut Output {
        let next = self
            .last_output_stable_index
            .checked_add(1)
            .unwrap_or_else(|| panic!("animation {:?}: output stable index overflow", self.id));
        self.last_output_stable_index = next;
        let stable_index = OutputIndex(next);
        debug!("animation {:?}: add output {}", self.id, stable_index);
        self.outputs.push(Output::new(stable_index));
        let last = self.outputs.len() - 1;
        &mut self.outputs[last]
    }

    /// Create an output meant for `animated_id`: named after it and
    /// restricted to its type. Does not assign anything.
    pub fn output_add_for(&mut self, animated_id: &impl AnimatedId) -> OutputIndex {
        let stable_index = self.output_add().stable_index();
        self.output_name_set(stable_index, animated_id.name());
        if let Some(output) = self.output_for_stable_index_mut(stable_index) {
            output.idtype = animated_id.id_type();
        }
        stable_index
    }

    pub fn output_for_stable_index(&self, stable_index: OutputIndex) -> Option<&Output> {
        self.outputs.iter().find(|o| o.stable_index() == stable_index)
    }

    pub fn output_for_stable_index_mut(&mut self, stable_index: OutputIndex) -> Option<&mut Output> {
        self.outputs
            .iter_mut()
            .find(|o| o.stable_index() == stable_index)
    }

    pub fn output_find_by_name(&self, name: &str) -> Option<&Output> {
        self.outputs.iter().find(|o| o.name() == name)
    }

    /// Rename an output, appending a `.NNN` suffix when another output already
    /// uses the name. Returns the name actually set, or `None` for an unknown
    /// output.
    pub fn output_name_set(&mut self, stable_index: OutputIndex, new_name: &str) -> Option<&str> {
        let position = self
            .outputs
            .iter()
            .position(|o| o.stable_index() == stable_index)?;

        // Unnamed outputs never collide.
        let outputs = &self.outputs;
        let name = if new_name.is_empty() {
            String::new()
        } else {
            unique_name(new_name, |candidate| {
                outputs
                    .iter()
                    .enumerate()
                    .any(|(i, o)| i != position && o.name() == candidate)
            })
        };

        let output = &mut self.outputs[position];
        output.set_name_unchecked(name);
        Some(output.name())
    }

    /// Find the output that best fits `animated_id`:
    /// 1. when already assigned to this animation, the recorded stable index;
    /// 2. the output name recorded in the object's side-table;
    /// 3. the object's own name.
    ///
    /// Every candidate must also accept the object's type.
    pub fn find_suitable_output_for(&self, animated_id: &impl AnimatedId) -> Option<&Output> {
        let suitable = |output: &&Output| output.is_suitable_for(animated_id);

        if let Some(adt) = animated_id.anim_data() {
            if adt.animation == Some(self.id) {
                let by_index = self
                    .output_for_stable_index(adt.output_stable_index)
                    .filter(suitable);
                if by_index.is_some() {
                    return by_index;
                }
            }

            if !adt.output_name.is_empty() {
                let by_name = self.output_find_by_name(&adt.output_name).filter(suitable);
                if by_name.is_some() {
                    return by_name;
                }
            }
        }

        self.output_find_by_name(animated_id.name()).filter(suitable)
    }

    /// Bind `animated_id` to this animation, optionally through `output`.
    ///
    /// Without an output the object is bound in an explicit "no output yet"
    /// state; a previously recorded output name is kept for later matching.
    pub fn assign_id(
        &mut self,
        output: Option<OutputIndex>,
        animated_id: &mut impl AnimatedId,
    ) -> Result<(), AssignError> {
        if animated_id
            .anim_data()
            .is_some_and(|adt| adt.animation.is_some())
        {
            return Err(AssignError::AlreadyAssigned);
        }
        let id_type = animated_id.id_type();
        if animated_id.ensure_anim_data().is_none() {
            return Err(AssignError::NoAnimData { actual: id_type });
        }

        let bound_name = match output {
            Some(stable_index) => {
                let out = self
                    .output_for_stable_index_mut(stable_index)
                    .ok_or(AssignError::UnknownOutput(stable_index))?;
                out.assign_id(&*animated_id)?;
                if out.name().is_empty() {
                    self.output_name_set(stable_index, animated_id.name());
                }
                self.output_for_stable_index(stable_index)
                    .map(|out| out.name().to_string())
            }
            None => None,
        };

        let anim_id = self.id;
        let Some(adt) = animated_id.anim_data_mut() else {
            return Err(AssignError::NoAnimData { actual: id_type });
        };
        match (output, bound_name) {
            (Some(stable_index), Some(name)) => {
                adt.output_stable_index = stable_index;
                adt.output_name = name;
            }
            _ => adt.output_stable_index = OutputIndex::NONE,
        }
        adt.animation = Some(anim_id);
        self.users += 1;

        debug!(
            "animation {:?}: assigned to '{}' via output {}",
            anim_id,
            animated_id.name(),
            output.unwrap_or(OutputIndex::NONE)
        );
        Ok(())
    }

    /// Unbind `animated_id`, refreshing its recorded output name first.
    ///
    /// Panics when the object is not bound to this animation.
    pub fn unassign_id(&mut self, animated_id: &mut impl AnimatedId) {
        let anim_id = self.id;
        let adt = animated_id
            .anim_data_mut()
            .filter(|adt| adt.animation == Some(anim_id))
            .unwrap_or_else(|| panic!("animation {anim_id:?}: unassigning an object it does not animate"));

        if let Some(out) = self
            .outputs
            .iter()
            .find(|o| o.stable_index() == adt.output_stable_index)
        {
            adt.output_name = out.name().to_string();
        }

        adt.animation = None;
        self.users = self.users.saturating_sub(1);
        debug!("animation {:?}: unassigned from '{}'", anim_id, animated_id.name());
    }

    /// Objects among `candidates` that this output currently drives.
    pub fn output_users<'a, T: AnimatedId>(
        &self,
        stable_index: OutputIndex,
        candidates: impl IntoIterator<Item = &'a T>,
    ) -> Vec<&'a T>
    where
        T: 'a,
    {
        candidates
            .into_iter()
            .filter(|id| {
                id.anim_data().is_some_and(|adt| {
                    adt.animation == Some(self.id) && adt.output_stable_index == stable_index
                })
            })
            .collect()
    }

    /* Whole-animation operations. */

    /// Every curve, in layer → strip → channel group → curve order.
    pub fn fcurves(&self) -> impl Iterator<Item = &FCurve> {
        self.layers
            .iter()
            .flat_map(|layer| layer.strips().iter())
            .filter_map(|strip| strip.as_keyframe())
            .flat_map(|key_strip| key_strip.channels_for_output().iter())
            .flat_map(|chans| chans.fcurves().iter())
    }

    pub fn fcurves_mut(&mut self) -> impl Iterator<Item = &mut FCurve> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.strips_mut().iter_mut())
            .filter_map(|strip| strip.as_keyframe_mut())
            .flat_map(|key_strip| key_strip.channels_for_output_mut().iter_mut())
            .flat_map(|chans| chans.fcurves_mut().iter_mut())
    }

    /// Deep copy. Layers, strips, curves and outputs keep their order and
    /// stable indices; the copy has a fresh id and no users.
    pub fn duplicate(&self) -> Self {
        Self::from_parts(
            self.layers.iter().map(Layer::duplicate).collect(),
            self.layer_active_index,
            self.outputs.clone(),
            self.last_output_stable_index,
        )
    }

    /// Free all layers (with their strips and curves) and outputs.
    pub fn free_data(&mut self) {
        self.layers.clear();
        self.layer_active_index = None;
        self.outputs.clear();
    }
}
