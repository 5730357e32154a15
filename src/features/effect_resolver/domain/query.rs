//! A resolver query: what is being looked up and through which sub-map.
//! Property getters, setters, and constructors use parallel
//! lookup paths with dedicated sub-maps.

/// Which per-type sub-map a member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

/// One resolver lookup. `signature` is the full `Type::Member(Param,Param)`
/// string used for the built-in catalog and the memoization key; `member` is
/// the bare name used for the manifest member-name fallback.
#[derive(Debug, Clone)]
pub struct ResolveQuery {
    pub type_name: String,
    pub member: String,
    pub signature: String,
    pub kind: MemberKind,
}

impl ResolveQuery {
    pub fn method(type_name: impl Into<String>, member: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            member: member.into(),
            signature: signature.into(),
            kind: MemberKind::Method,
        }
    }
}
