//! Small integer ids for arena-style graph nodes.
//!
//! Call graphs, CFGs and recursive type references are cyclic; modeling them as
//! arena-allocated values indexed by a small integer id removes the ownership
//! tangle a direct reference graph would create and makes fixpoint iteration
//! allocation-free after the arena is built.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(i: usize) -> Self {
                $name(i as u32)
            }
        }
    };
}

arena_id!(FunctionId);
arena_id!(BlockId);
