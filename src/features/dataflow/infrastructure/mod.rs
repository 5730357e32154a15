pub mod live_variables;
pub mod reaching_definitions;
pub mod uninitialized;
