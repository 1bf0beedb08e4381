//! Minimal animation library storage, keyed by [`AnimId`].

use log::debug;

use crate::animation::Animation;
use crate::ids::AnimId;

#[derive(Default, Debug)]
pub struct AnimationLibrary {
    items: Vec<Animation>,
}

impl AnimationLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an animation and return its id.
    pub fn add(&mut self, animation: Animation) -> AnimId {
        let id = animation.id();
        debug!("library: add animation {id:?}");
        self.items.push(animation);
        id
    }

    pub fn get(&self, id: AnimId) -> Option<&Animation> {
        self.items.iter().find(|a| a.id() == id)
    }

    pub fn get_mut(&mut self, id: AnimId) -> Option<&mut Animation> {
        self.items.iter_mut().find(|a| a.id() == id)
    }

    /// Remove the animation from the library. Objects still referring to it
    /// keep a dangling id that evaluation treats as unassigned.
    pub fn remove(&mut self, id: AnimId) -> Option<Animation> {
        let position = self.items.iter().position(|a| a.id() == id)?;
        debug!("library: remove animation {id:?}");
        Some(self.items.remove(position))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
