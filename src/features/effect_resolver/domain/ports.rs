//! Collaborator trait the resolver's infrastructure half implements, kept
//! separate so the layered-lookup algorithm can be tested against a fake
//! catalog without touching the real embedded one.

use crate::features::effect_model::EffectSet;

/// The embedded built-in catalog (step 1 of its lookup order).
pub trait BuiltinCatalog: Send + Sync {
    /// `Some(set)` when `signature` is declared; the caller distinguishes an
    /// empty declared set (`PureExplicit`) from no declaration (fall through to
    /// the manifest layer) by the `Option`, not by an empty `EffectSet`.
    fn lookup(&self, signature: &str) -> Option<EffectSet>;
}
