// Disk-backed response cache

pub mod models;
pub mod store;

pub use models::{CacheEntry, CacheStats};
pub use store::DiskCache;
