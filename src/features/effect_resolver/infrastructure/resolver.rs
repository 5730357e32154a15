//! Layered effect resolver: built-in catalog, then per-type
//! manifest entry, then namespace defaults, then `Unknown`. Memoizes by full
//! signature; the cache is read-mostly after phase 1 and safe to share across
//! threads without synchronization once built.

use crate::features::effect_model::domain::surface_codes;
use crate::features::effect_model::{Effect, EffectSet};
use crate::features::effect_resolver::domain::{BuiltinCatalog, MemberKind, ResolveQuery, Resolution};
use crate::features::manifest::domain::{ManifestTier, TieredManifest, TypeMapping};
use ahash::AHashMap;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

fn parse_effect_list(codes: &[String]) -> EffectSet {
    EffectSet::from(codes.iter().map(|code| {
        let (kind, value) = surface_codes::parse(code);
        Effect::new(kind, value)
    }))
}

fn member_map<'a>(mapping: &'a TypeMapping, kind: MemberKind) -> Option<&'a AHashMap<String, Vec<String>>> {
    match kind {
        MemberKind::Method => mapping.methods.as_ref(),
        MemberKind::Getter => mapping.getters.as_ref(),
        MemberKind::Setter => mapping.setters.as_ref(),
        MemberKind::Constructor => mapping.constructors.as_ref(),
    }
}

/// The namespace a type belongs to: everything before the last `.` segment, or
/// the empty namespace when the type name carries no dot.
fn namespace_of(type_name: &str) -> &str {
    match type_name.rfind('.') {
        Some(idx) => &type_name[..idx],
        None => "",
    }
}

/// True when `pattern` (an exact namespace or an `ns.*` wildcard) matches
/// `namespace`, and the wildcard's prefix length, for longest-prefix ordering.
fn namespace_match_len(pattern: &str, namespace: &str) -> Option<usize> {
    if let Some(prefix) = pattern.strip_suffix(".*") {
        if namespace == prefix || namespace.starts_with(&format!("{prefix}.")) {
            return Some(prefix.len());
        }
        None
    } else if pattern == namespace {
        Some(usize::MAX)
    } else {
        None
    }
}

pub struct EffectResolver {
    builtin: Arc<dyn BuiltinCatalog>,
    type_mappings: HashMap<String, TypeMapping>,
    manifests_desc_priority: Vec<TieredManifest>,
    cache: DashMap<String, Resolution>,
}

impl EffectResolver {
    pub fn new(builtin: Arc<dyn BuiltinCatalog>, manifests: Vec<TieredManifest>) -> Self {
        let type_mappings = crate::features::manifest::merge_type_mappings(&manifests);
        let mut manifests_desc_priority = manifests;
        manifests_desc_priority.sort_by_key(|m| std::cmp::Reverse(m.tier));
        Self {
            builtin,
            type_mappings,
            manifests_desc_priority,
            cache: DashMap::new(),
        }
    }

    pub fn resolve(&self, query: &ResolveQuery) -> Resolution {
        if let Some(hit) = self.cache.get(&query.signature) {
            return hit.clone();
        }
        let resolution = self.resolve_uncached(query);
        self.cache.insert(query.signature.clone(), resolution.clone());
        resolution
    }

    fn resolve_uncached(&self, query: &ResolveQuery) -> Resolution {
        if let Some(set) = self.builtin.lookup(&query.signature) {
            return if set.is_empty() {
                Resolution::PureExplicit
            } else {
                Resolution::Resolved(set)
            };
        }

        if let Some(mapping) = self.type_mappings.get(&query.type_name) {
            if let Some(map) = member_map(mapping, query.kind) {
                if let Some(codes) = map.get(&query.signature) {
                    return Resolution::Resolved(parse_effect_list(codes));
                }
                if let Some(codes) = map.get(&query.member) {
                    return Resolution::Resolved(parse_effect_list(codes));
                }
                if let Some(codes) = map.get("*") {
                    return Resolution::Resolved(parse_effect_list(codes));
                }
            }
            if let Some(codes) = &mapping.default_effects {
                return Resolution::Resolved(parse_effect_list(codes));
            }
        }

        if let Some(set) = self.resolve_namespace_default(&query.type_name) {
            return Resolution::Resolved(set);
        }

        Resolution::Unknown
    }

    fn resolve_namespace_default(&self, type_name: &str) -> Option<EffectSet> {
        let namespace = namespace_of(type_name);
        for manifest in &self.manifests_desc_priority {
            let mut best: Option<(usize, &Vec<String>)> = None;
            for (pattern, codes) in &manifest.document.namespace_defaults {
                if let Some(len) = namespace_match_len(pattern, namespace) {
                    if best.map(|(best_len, _)| len > best_len).unwrap_or(true) {
                        best = Some((len, codes));
                    }
                }
            }
            if let Some((_, codes)) = best {
                return Some(parse_effect_list(codes));
            }
        }
        None
    }
}
