pub mod loader;
pub mod store;

pub use loader::{open_store, resolve_config_path, Endpoints};
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore};
