//! The on-disk manifest shape: a versioned document mapping types
//! and namespaces to surface-code effect lists.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A single loaded manifest document, tagged with the tier it was discovered at
/// so the merge pass (see `infrastructure::merge`) can order them.
///
/// The per-type and namespace maps are `AHashMap` rather than the standard
/// library's hasher — one loaded manifest's maps are looked up on every
/// resolver query, the same reasoning the call-graph's node attribute maps use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestDocument {
    pub version: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mappings: Vec<TypeMapping>,
    #[serde(default, rename = "namespaceDefaults")]
    pub namespace_defaults: AHashMap<String, Vec<String>>,
}

/// Per-type effect declarations. Surface-code lists are kept as raw strings
/// here; parsing into [`crate::features::effect_model::Effect`] happens when the
/// resolver consults a mapping, not at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeMapping {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, rename = "defaultEffects")]
    pub default_effects: Option<Vec<String>>,
    #[serde(default)]
    pub methods: Option<AHashMap<String, Vec<String>>>,
    #[serde(default)]
    pub getters: Option<AHashMap<String, Vec<String>>>,
    #[serde(default)]
    pub setters: Option<AHashMap<String, Vec<String>>>,
    #[serde(default)]
    pub constructors: Option<AHashMap<String, Vec<String>>>,
}

/// The four discovery tiers, lowest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ManifestTier {
    BuiltIn,
    User,
    Solution,
    Project,
}

/// A document paired with the tier it was loaded from.
#[derive(Debug, Clone)]
pub struct TieredManifest {
    pub tier: ManifestTier,
    pub source_path: String,
    pub document: ManifestDocument,
}
