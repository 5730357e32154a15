//! Parses a discovered manifest file into a [`ManifestDocument`]. Parsing is
//! kept independent from validation: a parse failure becomes one
//! [`LoadError`] and excludes only that file, never the whole load.

use super::discovery::DiscoveredManifest;
use crate::features::manifest::domain::{LoadError, ManifestDocument, TieredManifest};
use std::fs;
use std::path::Path;

fn parse_document(path: &Path, content: &str) -> Result<ManifestDocument, String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
        Some("yaml") | Some("yml") => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        other => Err(format!("unsupported manifest extension: {other:?}")),
    }
}

/// Loads every discovered manifest, collecting parse failures as [`LoadError`]s
/// rather than aborting on the first one.
pub fn load_all(discovered: &[DiscoveredManifest]) -> (Vec<TieredManifest>, Vec<LoadError>) {
    let mut loaded = Vec::new();
    let mut errors = Vec::new();

    for entry in discovered {
        let source_path = entry.path.display().to_string();
        match fs::read_to_string(&entry.path) {
            Ok(content) => match parse_document(&entry.path, &content) {
                Ok(document) => loaded.push(TieredManifest {
                    tier: entry.tier,
                    source_path: source_path.clone(),
                    document,
                }),
                Err(message) => errors.push(LoadError::new(source_path, message)),
            },
            Err(io_err) => errors.push(LoadError::new(source_path, io_err.to_string())),
        }
    }

    (loaded, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::manifest::domain::ManifestTier;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_valid_json_and_yaml() {
        let dir = tempdir().unwrap();
        let json_path = dir.path().join("a.json");
        let yaml_path = dir.path().join("b.yaml");
        fs::write(&json_path, r#"{"version": 1, "mappings": []}"#).unwrap();
        fs::write(&yaml_path, "version: 1\nmappings: []\n").unwrap();

        let discovered = vec![
            DiscoveredManifest {
                tier: ManifestTier::User,
                path: json_path,
            },
            DiscoveredManifest {
                tier: ManifestTier::Solution,
                path: yaml_path,
            },
        ];
        let (loaded, errors) = load_all(&discovered);
        assert_eq!(loaded.len(), 2);
        assert!(errors.is_empty());
    }

    #[test]
    fn one_bad_file_does_not_abort_the_others() {
        let dir = tempdir().unwrap();
        let bad_path = dir.path().join("bad.json");
        let good_path = dir.path().join("good.json");
        fs::write(&bad_path, "{ not json").unwrap();
        fs::write(&good_path, r#"{"version": 1, "mappings": []}"#).unwrap();

        let discovered = vec![
            DiscoveredManifest {
                tier: ManifestTier::User,
                path: bad_path,
            },
            DiscoveredManifest {
                tier: ManifestTier::User,
                path: good_path,
            },
        ];
        let (loaded, errors) = load_all(&discovered);
        assert_eq!(loaded.len(), 1);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let discovered = vec![DiscoveredManifest {
            tier: ManifestTier::Project,
            path: "/nonexistent/manifest.json".into(),
        }];
        let (loaded, errors) = load_all(&discovered);
        assert!(loaded.is_empty());
        assert_eq!(errors.len(), 1);
    }
}
