//! Priority merge of type mappings across manifest tiers.
//!
//! Each tier's mapping for a type fully replaces any prior tier's mapping for
//! that same type: "within a type the method/getter/setter/constructor maps are
//! replaced wholesale, not merged at key level, so higher tiers fully own a type
//! they redeclare."

use super::document::{ManifestTier, TieredManifest, TypeMapping};
use std::collections::HashMap;

/// Builds the per-type record the resolver consults, walking tiers in ascending
/// priority (`BuiltIn` is not part of this merge — the resolver checks its own
/// built-in catalog before ever reaching a manifest).
pub fn merge_type_mappings(manifests: &[TieredManifest]) -> HashMap<String, TypeMapping> {
    let mut ordered: Vec<&TieredManifest> = manifests
        .iter()
        .filter(|m| m.tier != ManifestTier::BuiltIn)
        .collect();
    ordered.sort_by_key(|m| m.tier);

    let mut merged = HashMap::new();
    for manifest in ordered {
        for mapping in &manifest.document.mappings {
            merged.insert(mapping.type_name.clone(), mapping.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::manifest::domain::document::ManifestDocument;
    use ahash::AHashMap as Map;

    fn manifest(tier: ManifestTier, type_name: &str, effects: &[&str]) -> TieredManifest {
        TieredManifest {
            tier,
            source_path: format!("{tier:?}"),
            document: ManifestDocument {
                version: 1,
                description: None,
                mappings: vec![TypeMapping {
                    type_name: type_name.to_string(),
                    default_effects: Some(effects.iter().map(|s| s.to_string()).collect()),
                    methods: None,
                    getters: None,
                    setters: None,
                    constructors: None,
                }],
                namespace_defaults: Map::new(),
            },
        }
    }

    #[test]
    fn higher_tier_fully_overrides_lower_tier_for_same_type() {
        let manifests = vec![
            manifest(ManifestTier::User, "File", &["cw"]),
            manifest(ManifestTier::Project, "File", &["fs:w"]),
        ];
        let merged = merge_type_mappings(&manifests);
        let file = merged.get("File").unwrap();
        assert_eq!(file.default_effects.as_deref(), Some(&["fs:w".to_string()][..]));
    }

    #[test]
    fn distinct_types_from_different_tiers_both_survive() {
        let manifests = vec![
            manifest(ManifestTier::User, "File", &["cw"]),
            manifest(ManifestTier::Solution, "Socket", &["net:rw"]),
        ];
        let merged = merge_type_mappings(&manifests);
        assert!(merged.contains_key("File"));
        assert!(merged.contains_key("Socket"));
    }

    #[test]
    fn builtin_tier_is_excluded_from_manifest_merge() {
        let manifests = vec![manifest(ManifestTier::BuiltIn, "File", &["cw"])];
        assert!(merge_type_mappings(&manifests).is_empty());
    }
}
