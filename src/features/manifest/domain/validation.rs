//! Manifest validation: a pass independent from parsing, so a malformed
//! field produces an ordered, localized load error instead of rejecting
//! the whole document.

use super::document::{ManifestDocument, TieredManifest};
use crate::features::effect_model::domain::surface_codes;

pub const SUPPORTED_VERSION: u32 = 1;

/// One problem found in a loaded manifest, localized to the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub source_path: String,
    pub message: String,
}

impl LoadError {
    pub fn new(source_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            message: message.into(),
        }
    }
}

/// Validates one document, collecting every problem rather than stopping at the
/// first ("Violations are recorded as load errors without
/// rejecting the manifest entirely").
pub fn validate(manifest: &TieredManifest) -> Vec<LoadError> {
    let mut errors = Vec::new();
    let doc = &manifest.document;
    check_version(doc, &manifest.source_path, &mut errors);
    for mapping in &doc.mappings {
        if mapping.type_name.trim().is_empty() {
            errors.push(LoadError::new(
                &manifest.source_path,
                "type mapping has an empty type name",
            ));
        }
        check_codes(&mapping.default_effects, &mapping.type_name, manifest, &mut errors);
        for (group, codes_by_name) in [
            ("methods", &mapping.methods),
            ("getters", &mapping.getters),
            ("setters", &mapping.setters),
            ("constructors", &mapping.constructors),
        ] {
            if let Some(map) = codes_by_name {
                for codes in map.values() {
                    check_codes(&Some(codes.clone()), &format!("{}.{group}", mapping.type_name), manifest, &mut errors);
                }
            }
        }
    }
    for codes in doc.namespace_defaults.values() {
        check_codes(&Some(codes.clone()), "namespaceDefaults", manifest, &mut errors);
    }
    errors
}

fn check_version(doc: &ManifestDocument, source_path: &str, errors: &mut Vec<LoadError>) {
    if doc.version != SUPPORTED_VERSION {
        errors.push(LoadError::new(
            source_path,
            format!(
                "unsupported manifest version {} (expected {SUPPORTED_VERSION})",
                doc.version
            ),
        ));
    }
}

fn check_codes(
    codes: &Option<Vec<String>>,
    context: &str,
    manifest: &TieredManifest,
    errors: &mut Vec<LoadError>,
) {
    let Some(codes) = codes else { return };
    for code in codes {
        if !surface_codes::is_known(code) {
            errors.push(LoadError::new(
                &manifest.source_path,
                format!("unknown effect code '{code}' in {context}"),
            ));
        }
    }
}
