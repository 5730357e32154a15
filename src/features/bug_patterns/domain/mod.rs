mod guard;

pub use guard::{guards_from_condition, Guard};
