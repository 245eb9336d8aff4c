//! Archive export engine.

pub mod export;

pub use export::{ArchiveService, NamedBlob};
