//! Manifest discovery, parsing, validation and priority merge.

pub mod domain;
pub mod infrastructure;

use crate::config::ManifestRoots;
use domain::{LoadError, TieredManifest};
use tracing::warn;

pub use domain::{merge_type_mappings, ManifestDocument, ManifestTier, TypeMapping};

/// Discovers, parses and validates every manifest reachable from `roots`.
/// Returns the manifests that passed validation plus every load error
/// encountered along the way — a bad file never excludes the rest
///.
pub fn load_and_validate(roots: &ManifestRoots) -> (Vec<TieredManifest>, Vec<LoadError>) {
    let discovered = infrastructure::discover(roots);
    let (loaded, mut errors) = infrastructure::load_all(&discovered);

    let mut valid = Vec::new();
    for manifest in loaded {
        let mut manifest_errors = domain::validate(&manifest);
        if manifest_errors.is_empty() {
            valid.push(manifest);
        } else {
            for error in &manifest_errors {
                warn!(source = %error.source_path, message = %error.message, "manifest validation failed");
            }
            errors.append(&mut manifest_errors);
        }
    }

    (valid, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn invalid_manifest_is_excluded_but_does_not_abort_others() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"{"version": 2, "mappings": []}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("good.json"),
            r#"{"version": 1, "mappings": [{"type": "File", "defaultEffects": ["fs:rw"]}]}"#,
        )
        .unwrap();

        let roots = ManifestRoots {
            user: Some(dir.path().to_path_buf()),
            solution: None,
            project_file: None,
        };
        let (valid, errors) = load_and_validate(&roots);
        assert_eq!(valid.len(), 1);
        assert_eq!(errors.len(), 1);
    }
}
