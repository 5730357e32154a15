pub mod document;
pub mod merge;
pub mod validation;

pub use document::{ManifestDocument, ManifestTier, TieredManifest, TypeMapping};
pub use merge::merge_type_mappings;
pub use validation::{validate, LoadError};
