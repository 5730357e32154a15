//! Resolver outcomes.

use crate::features::effect_model::EffectSet;

/// The three shapes a call's effects can resolve to.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A concrete effect set was found.
    Resolved(EffectSet),
    /// Explicitly declared pure (an empty built-in result).
    PureExplicit,
    /// No declaration found anywhere in the lookup chain.
    Unknown,
}

impl Resolution {
    /// The effect set this resolution contributes to an enclosing function's
    /// inferred effects.
    pub fn effect_set(&self) -> EffectSet {
        match self {
            Resolution::Resolved(set) => set.clone(),
            Resolution::PureExplicit => EffectSet::empty(),
            Resolution::Unknown => EffectSet::unknown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::effect_model::{Effect, EffectKind};

    #[test]
    fn pure_explicit_is_empty_not_unknown() {
        assert_eq!(Resolution::PureExplicit.effect_set(), EffectSet::empty());
    }

    #[test]
    fn unknown_resolution_is_top() {
        assert_eq!(Resolution::Unknown.effect_set(), EffectSet::unknown());
    }

    #[test]
    fn resolved_carries_its_set_through() {
        let set = EffectSet::single(Effect::new(EffectKind::Io, "console_write"));
        assert_eq!(Resolution::Resolved(set.clone()).effect_set(), set);
    }
}
