pub mod builtin_catalog;
pub mod resolver;

pub use builtin_catalog::{shared_catalog, StaticBuiltinCatalog, BUILTIN_CATALOG};
pub use resolver::EffectResolver;
