//! stratum-api-core: property identifiers, scalar write operations and
//! layer mix-mode arithmetic shared by the animation core and its hosts.

pub mod blend;
pub mod prop_ident;
pub mod write_ops;

pub use blend::{mix_values, MixMode};
pub use prop_ident::PropIdentifier;
pub use write_ops::{WriteBatch, WriteOp};
