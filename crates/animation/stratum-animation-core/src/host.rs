//! Host collaborator contracts.
//!
//! The core never owns host objects. Adapters implement [`AnimatedId`] for
//! anything that can be bound to an animation, and [`PropertyResolver`] for
//! anything evaluation can write into.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{AnimId, OutputIndex};

/// Two-byte object type code taken from the prefix of an object name
/// (`OB` for objects, `CA` for cameras, ...). `IdType::ANY` accepts every type.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdType(pub u16);

impl IdType {
    pub const ANY: IdType = IdType(0);
    pub const OBJECT: IdType = IdType::from_code(*b"OB");
    pub const CAMERA: IdType = IdType::from_code(*b"CA");
    pub const MATERIAL: IdType = IdType::from_code(*b"MA");

    pub const fn from_code(code: [u8; 2]) -> Self {
        IdType(u16::from_le_bytes(code))
    }

    /// Type encoded in the first two bytes of a prefixed name.
    pub fn from_name(name: &str) -> Self {
        match name.as_bytes() {
            [a, b, ..] => IdType::from_code([*a, *b]),
            _ => IdType::ANY,
        }
    }

    #[inline]
    pub fn is_any(self) -> bool {
        self.0 == 0
    }

    pub fn code(self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_any() {
            return f.write_str("ANY");
        }
        let [a, b] = self.code();
        write!(f, "{}{}", a as char, b as char)
    }
}

impl fmt::Debug for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdType({self})")
    }
}

/// Per-object side-table recording which animation and output drive it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimData {
    pub animation: Option<AnimId>,
    /// `OutputIndex::NONE` when bound without an output.
    pub output_stable_index: OutputIndex,
    /// Output name at the time of the last (un)assignment; used to match the
    /// object up again when the stable index is not trustworthy.
    pub output_name: String,
}

/// An object that can be animated.
pub trait AnimatedId {
    /// Full name including the two-byte type prefix, e.g. `OBCube`.
    fn name(&self) -> &str;

    fn id_type(&self) -> IdType {
        IdType::from_name(self.name())
    }

    fn anim_data(&self) -> Option<&AnimData>;

    fn anim_data_mut(&mut self) -> Option<&mut AnimData>;

    /// Create the side-table if needed. `None` means this object cannot be animated.
    fn ensure_anim_data(&mut self) -> Option<&mut AnimData>;
}

/// Resolves property paths to write locations and writes scalars into them.
pub trait PropertyResolver {
    /// A resolved write location, valid until the object's layout changes.
    type Handle: Clone;

    fn resolve(&self, rna_path: &str, array_index: i32) -> Option<Self::Handle>;

    fn write(&mut self, handle: &Self::Handle, value: f32);

    /// The original counterpart of an evaluated copy, if this is one.
    fn original_mut(&mut self) -> Option<&mut Self>
    where
        Self: Sized,
    {
        None
    }
}
