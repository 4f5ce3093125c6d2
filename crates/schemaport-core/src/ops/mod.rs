pub mod store;

pub use store::{MemoryStore, Store, StoredRecord};
