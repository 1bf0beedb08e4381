//! Error types for the animation core.
//!
//! Only recoverable failures are errors. Broken preconditions (a duplicate
//! channel group, unassigning an object bound elsewhere, stable-index
//! overflow) panic instead.

use thiserror::Error;

use crate::host::IdType;
use crate::ids::OutputIndex;

/// Why a key could not be inserted. The data model is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyframeInsertError {
    #[error("strip is not a keyframe strip, unable to insert keys here")]
    WrongStripType,

    #[error("FCurve {rna_path}[{array_index}] for output {output} doesn't allow inserting keys")]
    NotKeyable {
        rna_path: String,
        array_index: i32,
        output: OutputIndex,
    },

    #[error("could not insert key into FCurve {rna_path}[{array_index}] for output {output}")]
    Rejected {
        rna_path: String,
        array_index: i32,
        output: OutputIndex,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("object already has an animation assigned; unassign it first")]
    AlreadyAssigned,

    #[error("object of type {actual} cannot hold animation data")]
    NoAnimData { actual: IdType },

    #[error("output {output} is restricted to {expected}, object is {actual}")]
    IdTypeMismatch {
        output: OutputIndex,
        expected: IdType,
        actual: IdType,
    },

    #[error("output {0} does not belong to this animation")]
    UnknownOutput(OutputIndex),

    #[error("animation is not part of the library")]
    UnknownAnimation,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("animation json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{container}: stored count {expected} but {actual} items were read")]
    CountMismatch {
        container: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid stored animation: {0}")]
    Invalid(String),
}
