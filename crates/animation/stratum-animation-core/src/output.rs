//! Outputs: stable identities for "the thing being animated".

use serde::{Deserialize, Serialize};

use crate::error::AssignError;
use crate::host::{AnimatedId, IdType};
use crate::ids::OutputIndex;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    stable_index: OutputIndex,
    /// Unique within the owning animation; change it through
    /// [`Animation::output_name_set`](crate::Animation::output_name_set).
    name: String,
    /// `IdType::ANY` until the first successful assignment.
    #[serde(default)]
    pub idtype: IdType,
}

impl Output {
    pub(crate) fn new(stable_index: OutputIndex) -> Self {
        Self {
            stable_index,
            name: String::new(),
            idtype: IdType::ANY,
        }
    }

    #[inline]
    pub fn stable_index(&self) -> OutputIndex {
        self.stable_index
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name_unchecked(&mut self, name: String) {
        self.name = name;
    }

    pub fn is_suitable_for(&self, animated_id: &impl AnimatedId) -> bool {
        self.idtype.is_any() || self.idtype == animated_id.id_type()
    }

    /// Restrict this output to the object's type. Fails when it is already
    /// restricted to another type.
    pub fn assign_id(&mut self, animated_id: &impl AnimatedId) -> Result<(), AssignError> {
        if !self.is_suitable_for(animated_id) {
            return Err(AssignError::IdTypeMismatch {
                output: self.stable_index,
                expected: self.idtype,
                actual: animated_id.id_type(),
            });
        }
        if self.idtype.is_any() {
            self.idtype = animated_id.id_type();
        }
        Ok(())
    }
}
