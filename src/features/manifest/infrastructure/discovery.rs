//! Manifest discovery across the user/solution/project tiers.
//! The built-in tier has no on-disk presence — it is served directly by the
//! resolver's built-in catalog (see `features::effect_resolver`).

use crate::config::ManifestRoots;
use crate::features::manifest::domain::ManifestTier;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A manifest file found on disk, not yet parsed.
#[derive(Debug, Clone)]
pub struct DiscoveredManifest {
    pub tier: ManifestTier,
    pub path: PathBuf,
}

const USER_SUBPATH: &str = "calor-effects";
const PROJECT_FILE_NAME: &str = ".calor-effects.json";

/// Resolves the user-tier directory: the embedder's override, or the platform
/// config directory joined with a stable sub-path.
fn default_user_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(USER_SUBPATH))
}

/// Walks a directory for manifest files (`.json`, `.yaml`, `.yml`), sorted by
/// path for deterministic load order within a tier.
fn manifest_files_in(dir: &std::path::Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            matches!(
                entry.path().extension().and_then(|ext| ext.to_str()),
                Some("json") | Some("yaml") | Some("yml")
            )
        })
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();
    paths
}

/// Discovers every manifest file across the user and solution tiers, plus the
/// single project-tier file if present. Lowest priority first.
pub fn discover(roots: &ManifestRoots) -> Vec<DiscoveredManifest> {
    let mut found = Vec::new();

    let user_dir = roots.user.clone().or_else(default_user_dir);
    if let Some(dir) = user_dir {
        for path in manifest_files_in(&dir) {
            found.push(DiscoveredManifest {
                tier: ManifestTier::User,
                path,
            });
        }
    }

    if let Some(dir) = &roots.solution {
        for path in manifest_files_in(dir) {
            found.push(DiscoveredManifest {
                tier: ManifestTier::Solution,
                path,
            });
        }
    }

    let project_file = roots
        .project_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(PROJECT_FILE_NAME));
    if project_file.is_file() {
        found.push(DiscoveredManifest {
            tier: ManifestTier::Project,
            path: project_file,
        });
    }

    found
}
