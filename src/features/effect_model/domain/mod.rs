pub mod effect;
pub mod effect_kind;
pub mod effect_set;
pub mod subtyping;
pub mod surface_codes;

pub use effect::Effect;
pub use effect_kind::EffectKind;
pub use effect_set::{parse_declared, EffectSet};
