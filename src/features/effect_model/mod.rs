//! The effect value model: kinds, concrete effects, subtyping and effect sets.
//! This feature has no infrastructure half of its own — it is
//! pure value types consumed by `manifest`, `effect_resolver` and
//! `effect_enforcement`.

pub mod domain;

pub use domain::{parse_declared, Effect, EffectKind, EffectSet};
