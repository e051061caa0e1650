// Adapters layer: concrete implementations of the domain ports.

pub mod documents;
pub mod local_store;
pub mod memory;

pub use documents::StoredEntity;
pub use local_store::{FileKeyValueStore, MemoryKeyValueStore};
pub use memory::InMemoryBackend;
