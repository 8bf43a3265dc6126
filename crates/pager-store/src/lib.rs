//! # Pager Store
//!
//! Storage backends for service snapshots.
//!
//! - [`MemoryPersistence`] keeps snapshots for the lifetime of the process
//! - [`FilePersistence`] writes one JSON file per service

pub mod file;
pub mod memory;

pub use file::FilePersistence;
pub use memory::MemoryPersistence;
