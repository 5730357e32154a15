//! Subtyping ("covers") edges between effect values.
//!
//! Each `*_readwrite` value covers its `*_read` and `*_write` halves; the one
//! legacy edge (`filesystem_write` covers `file_delete`) exists so that manifests
//! written against the old `fd` alias still validate against a declaration of
//! `fs:w`.

use super::effect::Effect;
use super::effect_kind::EffectKind::Io;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `value -> values it covers`, keyed by the covering value's name. Every
/// entry here is `Io`-kinded; covering across other kinds is not defined.
static COVERS: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    HashMap::from([
        ("filesystem_readwrite", vec!["filesystem_read", "filesystem_write"]),
        ("network_readwrite", vec!["network_read", "network_write"]),
        ("database_readwrite", vec!["database_read", "database_write"]),
        ("environment_readwrite", vec!["environment_read", "environment_write"]),
        ("filesystem_write", vec!["file_delete"]),
    ])
});

/// True when declaring `wider` also satisfies a requirement of `narrower`.
pub fn covers(wider: &Effect, narrower: &Effect) -> bool {
    if wider.kind != Io || narrower.kind != Io {
        return false;
    }
    COVERS
        .get(wider.value.as_str())
        .is_some_and(|narrower_values| narrower_values.contains(&narrower.value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::effect::Effect;
    use super::super::effect_kind::EffectKind;
    use EffectKind::Io;

    #[test]
    fn readwrite_covers_both_halves() {
        let rw = Effect::new(Io, "filesystem_readwrite");
        assert!(covers(&rw, &Effect::new(Io, "filesystem_read")));
        assert!(covers(&rw, &Effect::new(Io, "filesystem_write")));
    }

    #[test]
    fn read_does_not_cover_readwrite() {
        let r = Effect::new(Io, "filesystem_read");
        let rw = Effect::new(Io, "filesystem_readwrite");
        assert!(!covers(&r, &rw));
    }

    #[test]
    fn legacy_file_delete_edge() {
        let w = Effect::new(Io, "filesystem_write");
        assert!(covers(&w, &Effect::new(Io, "file_delete")));
    }

    #[test]
    fn unrelated_values_do_not_cover() {
        let cw = Effect::new(Io, "console_write");
        let cr = Effect::new(Io, "console_read");
        assert!(!covers(&cw, &cr));
    }
}
