//! A single concrete effect value: a kind plus a free-form tag.

use super::effect_kind::EffectKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    pub value: String,
}

impl Effect {
    pub fn new(kind: EffectKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// True when `self` is exactly `other`, or covers it through the subtyping
    /// table: `other` may be satisfied by having declared `self`.
    pub fn satisfies(&self, other: &Effect) -> bool {
        self == other || super::subtyping::covers(self, other)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match super::surface_codes::canonical_code_for(self.kind, &self.value) {
            Some(code) => write!(f, "{code}"),
            None => write!(f, "{}:{}", self.kind.short_name(), self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EffectKind::*;

    #[test]
    fn equal_effects_satisfy_each_other() {
        let a = Effect::new(Io, "console_write");
        assert!(a.satisfies(&a.clone()));
    }

    #[test]
    fn readwrite_satisfies_read() {
        let rw = Effect::new(Io, "filesystem_readwrite");
        let r = Effect::new(Io, "filesystem_read");
        assert!(rw.satisfies(&r));
        assert!(!r.satisfies(&rw));
    }

    #[test]
    fn display_uses_canonical_code() {
        assert_eq!(Effect::new(Io, "console_write").to_string(), "cw");
    }

    #[test]
    fn display_falls_back_to_kind_value_for_unknown_pairs() {
        let e = Effect::new(Unknown, "some_custom_tag");
        assert_eq!(e.to_string(), "unknown:some_custom_tag");
    }
}
