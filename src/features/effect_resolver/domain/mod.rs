pub mod ports;
pub mod query;
pub mod resolution;

pub use ports::BuiltinCatalog;
pub use query::{MemberKind, ResolveQuery};
pub use resolution::Resolution;
