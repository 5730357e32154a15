pub mod bounds;
pub mod division;
pub mod null_deref;
pub mod overflow;
pub mod walker;
