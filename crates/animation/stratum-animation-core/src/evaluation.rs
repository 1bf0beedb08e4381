//! Evaluation: sample an animation for one output at one time and blend the
//! layers into a set of property values, then apply them to the object.
//!
//! Evaluation only resolves write locations; nothing is written to the object
//! until [`apply_evaluation_result`] runs, and then each property is written
//! exactly once.

use hashbrown::HashMap;
use log::trace;

use crate::animation::Animation;
use crate::assignment::assigned_animation;
use crate::host::{AnimatedId, PropertyResolver};
use crate::ids::OutputIndex;
use crate::layer::Layer;
use crate::library::AnimationLibrary;
use crate::strip::{KeyframeStrip, Strip, StripData};
use stratum_api_core::{mix_values, PropIdentifier, WriteBatch, WriteOp};

/// Time at which to evaluate, in the animation's frame space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EvalContext {
    pub eval_time: f32,
}

impl EvalContext {
    pub fn new(eval_time: f32) -> Self {
        Self { eval_time }
    }

    /// Context shifted into a strip's local time.
    pub fn offset(self, frame_offset: f32) -> Self {
        Self {
            eval_time: self.eval_time - frame_offset,
        }
    }
}

/// A value paired with where it should be written.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedProperty<H> {
    pub value: f32,
    pub handle: H,
}

impl<H> AnimatedProperty<H> {
    pub fn new(value: f32, handle: H) -> Self {
        Self { value, handle }
    }
}

/// Property values computed by a strip, a layer or a whole animation, not yet
/// applied. Iteration follows insertion order.
#[derive(Clone, Debug)]
pub struct EvaluationResult<H> {
    entries: Vec<(PropIdentifier, AnimatedProperty<H>)>,
    index: HashMap<PropIdentifier, usize>,
}

impl<H> Default for EvaluationResult<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<H> EvaluationResult<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any earlier value for the same property.
    pub fn store(&mut self, ident: PropIdentifier, value: f32, handle: H) {
        let prop = AnimatedProperty::new(value, handle);
        match self.index.get(&ident) {
            Some(&slot) => self.entries[slot].1 = prop,
            None => {
                self.index.insert(ident.clone(), self.entries.len());
                self.entries.push((ident, prop));
            }
        }
    }

    pub fn lookup(&self, ident: &PropIdentifier) -> Option<&AnimatedProperty<H>> {
        let slot = *self.index.get(ident)?;
        Some(&self.entries[slot].1)
    }

    pub fn lookup_mut(&mut self, ident: &PropIdentifier) -> Option<&mut AnimatedProperty<H>> {
        let slot = *self.index.get(ident)?;
        Some(&mut self.entries[slot].1)
    }

    /// Shorthand for looking up just the value.
    pub fn value(&self, rna_path: &str, array_index: i32) -> Option<f32> {
        self.lookup(&PropIdentifier::new(rna_path, array_index))
            .map(|prop| prop.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropIdentifier, &AnimatedProperty<H>)> {
        self.entries.iter().map(|(ident, prop)| (ident, prop))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The values as host-neutral write ops, in insertion order.
    pub fn to_write_batch(&self) -> WriteBatch {
        self.entries
            .iter()
            .map(|(ident, prop)| WriteOp::from_ident(ident, prop.value))
            .collect()
    }
}

/// Evaluate every curve of the output's channel group. `None` when the strip
/// has no channel group for the output.
pub fn evaluate_keyframe_strip<R: PropertyResolver>(
    object: &R,
    key_strip: &KeyframeStrip,
    output: OutputIndex,
    offset_context: &EvalContext,
) -> Option<EvaluationResult<R::Handle>> {
    let chans = key_strip.chans_for_out(output)?;

    let mut result = EvaluationResult::new();
    for fcurve in chans.fcurves() {
        if !fcurve.is_evaluatable() {
            trace!(
                "skip {}[{}]: curve not evaluatable",
                fcurve.rna_path,
                fcurve.array_index
            );
            continue;
        }
        let Some(handle) = object.resolve(&fcurve.rna_path, fcurve.array_index) else {
            trace!(
                "skip {}[{}]: property does not resolve",
                fcurve.rna_path,
                fcurve.array_index
            );
            continue;
        };
        let value = fcurve.evaluate(offset_context.eval_time);
        result.store(
            PropIdentifier::new(fcurve.rna_path.as_str(), fcurve.array_index),
            value,
            handle,
        );
    }
    Some(result)
}

fn evaluate_strip<R: PropertyResolver>(
    object: &R,
    strip: &Strip,
    output: OutputIndex,
    offset_context: &EvalContext,
) -> Option<EvaluationResult<R::Handle>> {
    match strip.data() {
        StripData::Keyframe(key_strip) => {
            evaluate_keyframe_strip(object, key_strip, output, offset_context)
        }
    }
}

/// Evaluate the first strip containing the time that has data for the output.
/// Strips are never combined within a layer.
pub fn evaluate_layer<R: PropertyResolver>(
    object: &R,
    layer: &Layer,
    output: OutputIndex,
    eval_context: &EvalContext,
) -> Option<EvaluationResult<R::Handle>> {
    layer
        .strips()
        .iter()
        .filter(|strip| strip.contains_frame(eval_context.eval_time))
        .find_map(|strip| {
            let offset_context = eval_context.offset(strip.frame_offset());
            evaluate_strip(object, strip, output, &offset_context)
        })
}

/// Blend a layer's result onto the accumulated result of the layers below.
///
/// Properties only in `current` are scaled by the layer influence; properties
/// only in `previous` pass through unchanged.
pub fn blend_layer_results<H: Clone>(
    previous: &EvaluationResult<H>,
    current: &EvaluationResult<H>,
    layer: &Layer,
) -> EvaluationResult<H> {
    let mut blended = previous.clone();
    let influence = layer.influence();

    for (ident, cur) in current.iter() {
        match blended.lookup_mut(ident) {
            Some(prev) => {
                prev.value = mix_values(prev.value, cur.value, layer.mix_mode, influence);
            }
            None => blended.store(ident.clone(), cur.value * influence, cur.handle.clone()),
        }
    }
    blended
}

/// Evaluate and blend all layers without touching the object.
pub fn evaluate_animation_result<R: PropertyResolver>(
    object: &R,
    animation: &Animation,
    output: OutputIndex,
    eval_context: &EvalContext,
) -> EvaluationResult<R::Handle> {
    let mut result: EvaluationResult<R::Handle> = EvaluationResult::new();

    for layer in animation.layers() {
        if layer.influence() <= 0.0 {
            continue;
        }
        let Some(layer_result) = evaluate_layer(object, layer, output, eval_context) else {
            continue;
        };
        if layer_result.is_empty() {
            continue;
        }

        // The first contributing layer is taken as is.
        result = if result.is_empty() {
            layer_result
        } else {
            blend_layer_results(&result, &layer_result, layer)
        };
    }
    result
}

/// Evaluate the animation for `output` and write the result into `object`.
///
/// With `flush_to_original`, the same values are also written into the
/// object's original counterpart.
pub fn evaluate_animation<R: PropertyResolver>(
    object: &mut R,
    animation: &Animation,
    output: OutputIndex,
    eval_context: &EvalContext,
    flush_to_original: bool,
) -> EvaluationResult<R::Handle> {
    let result = evaluate_animation_result(object, animation, output, eval_context);
    if !result.is_empty() {
        apply_evaluation_result(object, &result, flush_to_original);
    }
    result
}

/// Write every value of `result` into `object`.
pub fn apply_evaluation_result<R: PropertyResolver>(
    object: &mut R,
    result: &EvaluationResult<R::Handle>,
    flush_to_original: bool,
) {
    for (_, prop) in result.iter() {
        object.write(&prop.handle, prop.value);
    }

    if !flush_to_original {
        return;
    }
    let Some(original) = object.original_mut() else {
        return;
    };
    for (ident, prop) in result.iter() {
        // Handles belong to the evaluated object; resolve again on the original.
        match original.resolve(&ident.rna_path, ident.array_index) {
            Some(handle) => original.write(&handle, prop.value),
            None => trace!("flush: {ident} does not resolve on the original"),
        }
    }
}

/// Evaluate whatever animation and output `object` is assigned to.
///
/// `None` when the object is unassigned, bound without an output, or refers
/// to an animation missing from the library.
pub fn evaluate_assigned<T>(
    library: &AnimationLibrary,
    object: &mut T,
    eval_context: &EvalContext,
    flush_to_original: bool,
) -> Option<EvaluationResult<T::Handle>>
where
    T: AnimatedId + PropertyResolver,
{
    let animation = assigned_animation(library, &*object)?;
    let output = object.anim_data()?.output_stable_index;
    if output.is_none() {
        return None;
    }
    Some(evaluate_animation(
        object,
        animation,
        output,
        eval_context,
        flush_to_original,
    ))
}
