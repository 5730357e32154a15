pub mod discovery;
pub mod loader;

pub use discovery::{discover, DiscoveredManifest};
pub use loader::load_all;
