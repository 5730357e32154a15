//! Effect kind: a closed enumeration of the observable side-effect categories
//! an effect set can classify a function by.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffectKind {
    Io,
    Mutation,
    Memory,
    Exception,
    Nondeterminism,
    Unknown,
}

impl EffectKind {
    /// Short name used on the `kind:value` input form.
    pub fn short_name(self) -> &'static str {
        match self {
            EffectKind::Io => "io",
            EffectKind::Mutation => "mut",
            EffectKind::Memory => "mem",
            EffectKind::Exception => "exc",
            EffectKind::Nondeterminism => "nondet",
            EffectKind::Unknown => "unknown",
        }
    }

    /// Parses the `kind` prefix of a `kind:value` surface code. Returns `None` when
    /// the prefix isn't a recognized category, per its "else produce
    /// (Unknown, raw)" fallback.
    pub fn from_category(s: &str) -> Option<Self> {
        match s {
            "io" => Some(EffectKind::Io),
            "mut" | "mutation" => Some(EffectKind::Mutation),
            "mem" | "memory" => Some(EffectKind::Memory),
            "exc" | "exception" => Some(EffectKind::Exception),
            "nondet" | "nondeterminism" | "rand" => Some(EffectKind::Nondeterminism),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trip() {
        for kind in [
            EffectKind::Io,
            EffectKind::Mutation,
            EffectKind::Memory,
            EffectKind::Exception,
            EffectKind::Nondeterminism,
        ] {
            assert_eq!(EffectKind::from_category(kind.short_name()), Some(kind));
        }
    }

    #[test]
    fn unrecognized_category_is_none() {
        assert_eq!(EffectKind::from_category("bogus"), None);
    }
}
