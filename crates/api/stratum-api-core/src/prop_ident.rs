//! Property identifiers: an RNA-style property path plus an array index.
//!
//! Textual form is `path[index]`, e.g. `location[0]` or
//! `pose.bones["Arm"].rotation_euler[2]`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one scalar component of an animatable property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropIdentifier {
    pub rna_path: String,
    pub array_index: i32,
}

impl PropIdentifier {
    pub fn new(rna_path: impl Into<String>, array_index: i32) -> Self {
        Self {
            rna_path: rna_path.into(),
            array_index,
        }
    }
}

impl fmt::Display for PropIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.rna_path, self.array_index)
    }
}
