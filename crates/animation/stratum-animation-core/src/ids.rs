//! Identifiers for core entities.
//!
//! Two kinds of identity live here:
//! - [`OutputIndex`]: the persisted stable index of an [`Output`](crate::Output),
//!   allocated per animation and never reused.
//! - [`AnimId`], [`LayerId`], [`StripId`]: session-unique runtime handles,
//!   drawn from process-wide counters. They are not persisted; a loaded or
//!   duplicated animation gets fresh ones.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Stable identity of an output within its animation. `0` means "no output".
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputIndex(pub i32);

impl OutputIndex {
    pub const NONE: OutputIndex = OutputIndex(0);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for OutputIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_ANIM: AtomicU32 = AtomicU32::new(1);
static NEXT_LAYER: AtomicU32 = AtomicU32::new(1);
static NEXT_STRIP: AtomicU32 = AtomicU32::new(1);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct AnimId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct LayerId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StripId(pub u32);

impl AnimId {
    #[inline]
    pub fn next() -> Self {
        AnimId(NEXT_ANIM.fetch_add(1, Ordering::Relaxed))
    }
}

impl LayerId {
    #[inline]
    pub fn next() -> Self {
        LayerId(NEXT_LAYER.fetch_add(1, Ordering::Relaxed))
    }
}

impl StripId {
    #[inline]
    pub fn next() -> Self {
        StripId(NEXT_STRIP.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_ids_are_unique() {
        let a = AnimId::next();
        let b = AnimId::next();
        assert_ne!(a, b);
        assert_ne!(LayerId::next(), LayerId::next());
        assert_ne!(StripId::next(), StripId::next());
    }

    #[test]
    fn zero_output_index_is_none() {
        assert!(OutputIndex::NONE.is_none());
        assert!(OutputIndex(3).is_some());
        assert_eq!(OutputIndex::default(), OutputIndex::NONE);
        assert_eq!(OutputIndex(7).to_string(), "#7");
    }
}
