//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct access where needed, but callers should prefer the helpers.
//!
//! `NodeId` carries a **1-based** node label, matching how environment
//! layouts number their locations.  `NodeId(0)` never names a real node.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id! {
    /// A discrete location in the environment graph.  Labels run `1..=N`.
    pub struct NodeId(u32);
}

typed_id! {
    /// A simulation episode within a batch.
    pub struct EpisodeId(u32);
}

impl NodeId {
    /// Zero-based offset for indexing `N×N` matrices and per-node arrays.
    ///
    /// # Panics
    /// Panics in debug mode on `NodeId(0)` or the `INVALID` sentinel.
    #[inline(always)]
    pub fn offset(self) -> usize {
        debug_assert!(self.0 >= 1 && self != NodeId::INVALID);
        self.0 as usize - 1
    }
}
