//! Object-level assignment: bind an object to an animation from the library,
//! picking a suitable output automatically.

use log::debug;

use crate::animation::Animation;
use crate::error::AssignError;
use crate::host::AnimatedId;
use crate::ids::AnimId;
use crate::library::AnimationLibrary;

/// Assign the animation to `animated_id`.
///
/// Any animation already assigned is unassigned first. The output is picked
/// with [`Animation::find_suitable_output_for`]; when none fits, a new output
/// is added and named after the object. Objects that cannot hold animation
/// data are refused before anything is added.
pub fn assign_animation(
    library: &mut AnimationLibrary,
    animation: AnimId,
    animated_id: &mut impl AnimatedId,
) -> Result<(), AssignError> {
    if library.get(animation).is_none() {
        return Err(AssignError::UnknownAnimation);
    }

    unassign_animation(library, animated_id);

    let id_type = animated_id.id_type();
    if animated_id.ensure_anim_data().is_none() {
        return Err(AssignError::NoAnimData { actual: id_type });
    }

    let anim = library
        .get_mut(animation)
        .ok_or(AssignError::UnknownAnimation)?;
    let suitable = anim
        .find_suitable_output_for(&*animated_id)
        .map(|out| out.stable_index());
    let output = match suitable {
        Some(stable_index) => stable_index,
        None => anim.output_add().stable_index(),
    };
    anim.assign_id(Some(output), animated_id)
}

/// Unassign whatever animation `animated_id` has. A no-op for unassigned
/// objects.
pub fn unassign_animation(library: &mut AnimationLibrary, animated_id: &mut impl AnimatedId) {
    let Some(current) = get_animation(animated_id) else {
        return;
    };

    match library.get_mut(current) {
        Some(anim) => anim.unassign_id(animated_id),
        None => {
            debug!(
                "unassign_animation: '{}' referred to missing animation {current:?}",
                animated_id.name()
            );
            if let Some(adt) = animated_id.anim_data_mut() {
                adt.animation = None;
            }
        }
    }
}

/// The animation assigned to `animated_id`, if any.
pub fn get_animation(animated_id: &impl AnimatedId) -> Option<AnimId> {
    animated_id.anim_data().and_then(|adt| adt.animation)
}

/// Resolve the assigned animation through the library.
pub fn assigned_animation<'a>(
    library: &'a AnimationLibrary,
    animated_id: &impl AnimatedId,
) -> Option<&'a Animation> {
    library.get(get_animation(animated_id)?)
}
