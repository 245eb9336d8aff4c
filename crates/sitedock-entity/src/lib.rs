//! # sitedock-entity
//!
//! Domain entity models for SiteDock attachments. Every struct in this
//! crate represents a metadata record or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, and `Deserialize`.

pub mod file;
pub mod folder;
pub mod snapshot;

pub use file::{CreateFile, FileRecord};
pub use folder::{CreateFolder, Folder};
pub use snapshot::TreeSnapshot;
