//! Surface effect-code vocabulary: short lowercase tokens used in manifests
//! and diagnostics, bijective with the internal `(EffectKind, value)` pairs.
//!
//! Parsing a surface code tries, in order: the canonical table (exact match, a
//! total bijection with `(EffectKind, value)` pairs), the legacy-alias table
//! (parse-only, several legacy codes collapse onto a canonical pair; one — `fd` —
//! lands on an orphan value with its own subtyping edge), then the generic
//! `kind:value` form, then gives up with `(Unknown, raw)`.

use super::effect_kind::EffectKind;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `surface code -> (kind, value)`, a total bijection: [`canonical_code_for`] is its
/// exact inverse.
pub static CANONICAL: Lazy<HashMap<&'static str, (EffectKind, &'static str)>> = Lazy::new(|| {
    use EffectKind::*;
    HashMap::from([
        ("cw", (Io, "console_write")),
        ("cr", (Io, "console_read")),
        ("fs:r", (Io, "filesystem_read")),
        ("fs:w", (Io, "filesystem_write")),
        ("fs:rw", (Io, "filesystem_readwrite")),
        ("net:r", (Io, "network_read")),
        ("net:w", (Io, "network_write")),
        ("net:rw", (Io, "network_readwrite")),
        ("http", (Io, "network_http")),
        ("db:r", (Io, "database_read")),
        ("db:w", (Io, "database_write")),
        ("db:rw", (Io, "database_readwrite")),
        ("env:r", (Io, "environment_read")),
        ("env:w", (Io, "environment_write")),
        ("env", (Io, "environment_readwrite")),
        ("proc", (Io, "process")),
        ("alloc", (Memory, "allocation")),
        ("unsafe", (Memory, "unsafe")),
        ("time", (Nondeterminism, "time")),
        ("rand", (Nondeterminism, "random")),
        ("mut", (Mutation, "heap_write")),
        ("throw", (Exception, "intentional")),
    ])
});

/// Back-compatible aliases accepted on input only: never
/// produced by [`super::effect_set::EffectSet::display`].
pub static LEGACY: Lazy<HashMap<&'static str, (EffectKind, &'static str)>> = Lazy::new(|| {
    use EffectKind::*;
    HashMap::from([
        ("fw", (Io, "filesystem_write")),
        ("fr", (Io, "filesystem_read")),
        // `fd` has no canonical counterpart; it is its own value, covered by
        // `filesystem_write` through the legacy subtyping edge.
        ("fd", (Io, "file_delete")),
        ("net", (Io, "network_readwrite")),
        ("db", (Io, "database_readwrite")),
        ("dbr", (Io, "database_read")),
        ("dbw", (Io, "database_write")),
        ("rng", (Nondeterminism, "random")),
    ])
});

/// The exact inverse of [`CANONICAL`], for deterministic display.
pub static REVERSE: Lazy<HashMap<(EffectKind, &'static str), &'static str>> = Lazy::new(|| {
    CANONICAL
        .iter()
        .map(|(code, pair)| (*pair, *code))
        .collect()
});

/// Parse one surface code into its internal `(kind, value)` pair. Case-insensitive.
pub fn parse(code: &str) -> (EffectKind, String) {
    let lower = code.to_lowercase();
    if let Some((kind, value)) = CANONICAL.get(lower.as_str()) {
        return (*kind, value.to_string());
    }
    if let Some((kind, value)) = LEGACY.get(lower.as_str()) {
        return (*kind, value.to_string());
    }
    if let Some((category, value)) = lower.split_once(':') {
        if let Some(kind) = EffectKind::from_category(category) {
            return (kind, value.to_string());
        }
    }
    (EffectKind::Unknown, lower)
}

/// The canonical surface code for a `(kind, value)` pair, when one exists.
pub fn canonical_code_for(kind: EffectKind, value: &str) -> Option<&'static str> {
    REVERSE.get(&(kind, value)).copied()
}

/// True when `code` appears in the canonical or legacy table — every
/// declared effect code must appear in the known-codes table. The
/// generic `kind:value` fallback form is not itself "known" for validation
/// purposes — only the fixed vocabulary is.
pub fn is_known(code: &str) -> bool {
    let lower = code.to_lowercase();
    CANONICAL.contains_key(lower.as_str()) || LEGACY.contains_key(lower.as_str())
}
