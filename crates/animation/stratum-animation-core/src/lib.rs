//! Stratum Animation Core (engine-agnostic)
//!
//! A layered animation data model and its evaluator. An [`Animation`] owns an
//! ordered list of [`Layer`]s and a list of [`Output`]s. Each layer owns
//! [`Strip`]s; keyframe strips hold one [`ChannelsForOutput`] group of
//! [`FCurve`]s per output. Objects are bound to an animation through the
//! [`AnimData`] side-table they carry, and evaluation samples and blends the
//! layers for one output before writing the result into the object.
//!
//! Hosts plug in through [`AnimatedId`] and [`PropertyResolver`];
//! [`DataBlock`] is a small in-memory implementation of both.

pub mod animation;
pub mod assignment;
pub mod channels;
pub mod config;
pub mod data_block;
pub mod error;
pub mod evaluation;
pub mod fcurve;
pub mod host;
pub mod ids;
pub mod layer;
pub mod library;
pub mod naming;
pub mod output;
pub mod storage;
pub mod strip;

// Re-exports for consumers (adapters)
pub use animation::Animation;
pub use assignment::{assign_animation, assigned_animation, get_animation, unassign_animation};
pub use channels::ChannelsForOutput;
pub use config::{AutoSmoothing, Config, HandleType, Interpolation, KeyframeSettings, KeyframeType};
pub use data_block::{DataBlock, PropertyHandle};
pub use error::{AssignError, KeyframeInsertError, StorageError};
pub use evaluation::{
    apply_evaluation_result, blend_layer_results, evaluate_animation, evaluate_animation_result,
    evaluate_assigned, evaluate_keyframe_strip, evaluate_layer, AnimatedProperty, EvalContext,
    EvaluationResult,
};
pub use fcurve::{FCurve, FCurveFlags, Keyframe};
pub use host::{AnimData, AnimatedId, IdType, PropertyResolver};
pub use ids::{AnimId, LayerId, OutputIndex, StripId};
pub use layer::Layer;
pub use library::AnimationLibrary;
pub use output::Output;
pub use storage::{read_animation_json, write_animation_json};
pub use strip::{KeyframeStrip, Strip, StripData, StripType};
pub use stratum_api_core::{MixMode, PropIdentifier, WriteBatch, WriteOp};
