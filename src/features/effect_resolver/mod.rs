//! Layered effect resolution for call targets.

pub mod domain;
pub mod infrastructure;

pub use domain::{BuiltinCatalog, MemberKind, ResolveQuery, Resolution};
pub use infrastructure::{shared_catalog, EffectResolver, StaticBuiltinCatalog, BUILTIN_CATALOG};
