//! Effect sets: the lattice values effect inference and declarations traffic in.
//! `Unknown` is the distinguished top element — it absorbs any
//! union and is never a strict subset of a concrete set.

use super::effect::Effect;
use super::surface_codes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectSet {
    /// The empty set: a function proven to perform none of the tracked effects.
    Empty,
    /// Top: effects could not be determined (unresolved external call, etc.).
    Unknown,
    Concrete(BTreeSetWrapper),
}

/// `BTreeSet<Effect>` wrapped so ordering for display is stable regardless of
/// insertion order, without requiring `Effect: Ord` at every call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BTreeSetWrapper(BTreeSet<OrdEffect>);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
struct OrdEffect(Effect);

impl EffectSet {
    pub fn empty() -> Self {
        EffectSet::Empty
    }

    pub fn unknown() -> Self {
        EffectSet::Unknown
    }

    pub fn single(effect: Effect) -> Self {
        let mut set = BTreeSet::new();
        set.insert(OrdEffect(effect));
        EffectSet::Concrete(BTreeSetWrapper(set))
    }

    pub fn from(effects: impl IntoIterator<Item = Effect>) -> Self {
        let set: BTreeSet<OrdEffect> = effects.into_iter().map(OrdEffect).collect();
        if set.is_empty() {
            EffectSet::Empty
        } else {
            EffectSet::Concrete(BTreeSetWrapper(set))
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EffectSet::Empty)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, EffectSet::Unknown)
    }

    pub fn effects(&self) -> Vec<&Effect> {
        match self {
            EffectSet::Empty | EffectSet::Unknown => Vec::new(),
            EffectSet::Concrete(set) => set.0.iter().map(|e| &e.0).collect(),
        }
    }

    /// Union, with `Unknown` as absorbing top.
    pub fn union(&self, other: &EffectSet) -> EffectSet {
        match (self, other) {
            (EffectSet::Unknown, _) | (_, EffectSet::Unknown) => EffectSet::Unknown,
            (EffectSet::Empty, s) | (s, EffectSet::Empty) => s.clone(),
            (EffectSet::Concrete(a), EffectSet::Concrete(b)) => {
                let merged: BTreeSet<OrdEffect> = a.0.union(&b.0).cloned().collect();
                EffectSet::Concrete(BTreeSetWrapper(merged))
            }
        }
    }

    /// True when every effect `other` requires is satisfied by something declared
    /// in `self`, treating subtyping covers-edges as satisfying.
    /// `Unknown` is never a subset of anything but itself; nothing is a subset of
    /// `Unknown` except `Empty`.
    pub fn is_subset(&self, other: &EffectSet) -> bool {
        match (self, other) {
            (EffectSet::Empty, _) => true,
            (EffectSet::Unknown, EffectSet::Unknown) => true,
            (EffectSet::Unknown, _) => false,
            (_, EffectSet::Unknown) => true,
            (EffectSet::Concrete(a), EffectSet::Concrete(b)) => a.0.iter().all(|required| {
                b.0.iter().any(|declared| declared.0.satisfies(&required.0))
            }),
            (EffectSet::Concrete(_), EffectSet::Empty) => false,
        }
    }

    /// Effects in `self` not satisfied by anything in `other`.
    pub fn difference(&self, other: &EffectSet) -> EffectSet {
        match (self, other) {
            (EffectSet::Empty, _) => EffectSet::Empty,
            (s, EffectSet::Unknown) => {
                let _ = s;
                EffectSet::Empty
            }
            (EffectSet::Unknown, _) => EffectSet::Unknown,
            (EffectSet::Concrete(a), EffectSet::Empty) => EffectSet::Concrete(a.clone()),
            (EffectSet::Concrete(a), EffectSet::Concrete(b)) => {
                let remaining: BTreeSet<OrdEffect> = a
                    .0
                    .iter()
                    .filter(|required| !b.0.iter().any(|declared| declared.0.satisfies(&required.0)))
                    .cloned()
                    .collect();
                if remaining.is_empty() {
                    EffectSet::Empty
                } else {
                    EffectSet::Concrete(BTreeSetWrapper(remaining))
                }
            }
        }
    }
}

impl fmt::Display for EffectSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectSet::Empty => write!(f, "[pure]"),
            EffectSet::Unknown => write!(f, "[unknown]"),
            EffectSet::Concrete(set) => {
                // OrdEffect orders by (kind, value), i.e. "sorted by kind then value"
                //; the surface code is only chosen at render time.
                let codes: Vec<String> = set.0.iter().map(|e| e.0.to_string()).collect();
                write!(f, "[{}]", codes.join(","))
            }
        }
    }
}

/// Parses a comma-separated declared-effects string, e.g.
/// `"cw, fs:w"`. An empty or whitespace-only string parses to [`EffectSet::Empty`].
pub fn parse_declared(raw: &str) -> EffectSet {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return EffectSet::Empty;
    }
    let effects = trimmed.split(',').map(|code| {
        let (kind, value) = surface_codes::parse(code.trim());
        Effect::new(kind, value)
    });
    EffectSet::from(effects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::effect_kind::EffectKind::Io;

    fn e(value: &str) -> Effect {
        Effect::new(Io, value)
    }

    #[test]
    fn union_is_idempotent() {
        let s = EffectSet::single(e("console_write"));
        assert_eq!(s.union(&s), s);
    }

    #[test]
    fn union_is_commutative() {
        let a = EffectSet::single(e("console_write"));
        let b = EffectSet::single(e("console_read"));
        assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn union_is_associative() {
        let a = EffectSet::single(e("console_write"));
        let b = EffectSet::single(e("console_read"));
        let c = EffectSet::single(e("filesystem_read"));
        assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
    }

    #[test]
    fn unknown_absorbs_union() {
        let a = EffectSet::single(e("console_write"));
        assert_eq!(a.union(&EffectSet::unknown()), EffectSet::unknown());
    }

    #[test]
    fn empty_is_identity_for_union() {
        let a = EffectSet::single(e("console_write"));
        assert_eq!(a.union(&EffectSet::empty()), a);
    }

    #[test]
    fn is_subset_reflexive() {
        let a = EffectSet::from([e("console_write"), e("filesystem_read")]);
        assert!(a.is_subset(&a));
    }

    #[test]
    fn empty_is_subset_of_everything() {
        assert!(EffectSet::empty().is_subset(&EffectSet::single(e("console_write"))));
        assert!(EffectSet::empty().is_subset(&EffectSet::empty()));
        assert!(EffectSet::empty().is_subset(&EffectSet::unknown()));
    }

    #[test]
    fn readwrite_declaration_covers_read_requirement() {
        let required = EffectSet::single(e("filesystem_read"));
        let declared = EffectSet::single(e("filesystem_readwrite"));
        assert!(required.is_subset(&declared));
        assert!(!declared.is_subset(&required));
    }

    #[test]
    fn anything_concrete_is_subset_of_unknown() {
        let a = EffectSet::single(e("console_write"));
        assert!(a.is_subset(&EffectSet::unknown()));
    }

    #[test]
    fn unknown_is_not_subset_of_concrete() {
        assert!(!EffectSet::unknown().is_subset(&EffectSet::single(e("console_write"))));
    }

    #[test]
    fn difference_drops_satisfied_effects() {
        let required = EffectSet::from([e("filesystem_read"), e("console_write")]);
        let declared = EffectSet::single(e("filesystem_readwrite"));
        let remaining = required.difference(&declared);
        assert_eq!(remaining, EffectSet::single(e("console_write")));
    }

    #[test]
    fn display_is_stable_regardless_of_insertion_order() {
        let a = EffectSet::from([e("filesystem_write"), e("console_write")]);
        let b = EffectSet::from([e("console_write"), e("filesystem_write")]);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "[cw,fs:w]");
    }

    #[test]
    fn empty_and_unknown_display() {
        assert_eq!(EffectSet::empty().to_string(), "[pure]");
        assert_eq!(EffectSet::unknown().to_string(), "[unknown]");
    }

    #[test]
    fn parse_declared_handles_commas_and_whitespace() {
        let s = parse_declared(" cw,  fs:w ,db:r");
        assert_eq!(s.to_string(), "[cw,db:r,fs:w]");
    }

    #[test]
    fn parse_declared_empty_string_is_empty_set() {
        assert_eq!(parse_declared("   "), EffectSet::empty());
    }
}

#[cfg(test)]
mod algebra_properties {
    use super::*;
    use super::super::effect_kind::EffectKind;
    use proptest::prelude::*;

    /// A handful of values per kind, including a subtyping pair
    /// (`filesystem_read`/`filesystem_readwrite`) so generated sets actually
    /// exercise the covers table instead of only ever comparing equal effects.
    fn effect_strategy() -> impl Strategy<Value = Effect> {
        prop_oneof![
            Just(Effect::new(EffectKind::Io, "console_write")),
            Just(Effect::new(EffectKind::Io, "console_read")),
            Just(Effect::new(EffectKind::Io, "filesystem_read")),
            Just(Effect::new(EffectKind::Io, "filesystem_write")),
            Just(Effect::new(EffectKind::Io, "filesystem_readwrite")),
            Just(Effect::new(EffectKind::Mutation, "global_state")),
            Just(Effect::new(EffectKind::Memory, "unsafe_pointer")),
            Just(Effect::new(EffectKind::Nondeterminism, "random")),
        ]
    }

    fn effect_set_strategy() -> impl Strategy<Value = EffectSet> {
        proptest::collection::vec(effect_strategy(), 0..6).prop_map(EffectSet::from)
    }

    proptest! {
        #[test]
        fn union_is_idempotent(s in effect_set_strategy()) {
            prop_assert_eq!(s.union(&s), s);
        }

        #[test]
        fn union_is_commutative(a in effect_set_strategy(), b in effect_set_strategy()) {
            prop_assert_eq!(a.union(&b), b.union(&a));
        }

        #[test]
        fn union_is_associative(
            a in effect_set_strategy(),
            b in effect_set_strategy(),
            c in effect_set_strategy(),
        ) {
            prop_assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
        }

        #[test]
        fn unknown_absorbs_union(s in effect_set_strategy()) {
            prop_assert_eq!(s.union(&EffectSet::unknown()), EffectSet::unknown());
        }

        #[test]
        fn is_subset_is_reflexive(s in effect_set_strategy()) {
            prop_assert!(s.is_subset(&s));
        }

        #[test]
        fn empty_is_always_a_subset(s in effect_set_strategy()) {
            prop_assert!(EffectSet::empty().is_subset(&s));
        }

        #[test]
        fn anything_is_a_subset_of_unknown(s in effect_set_strategy()) {
            prop_assert!(s.is_subset(&EffectSet::unknown()));
        }

        /// Shuffling the input list before building the set must not change how it
        /// displays — `BTreeSetWrapper` sorts by `(kind, value)` independent of
        /// insertion order.
        #[test]
        fn display_is_independent_of_insertion_order(
            mut effects in proptest::collection::vec(effect_strategy(), 0..6),
            seed in any::<u64>(),
        ) {
            let original = EffectSet::from(effects.clone());
            // A cheap deterministic shuffle keyed on `seed`, since proptest's
            // generators don't include one directly.
            let len = effects.len();
            for i in (1..len).rev() {
                let j = (seed as usize).wrapping_add(i).wrapping_mul(2654435761) % (i + 1);
                effects.swap(i, j);
            }
            let shuffled = EffectSet::from(effects);
            prop_assert_eq!(original.to_string(), shuffled.to_string());
        }
    }
}
