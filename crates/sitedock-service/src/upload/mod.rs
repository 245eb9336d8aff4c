//! Upload pipeline — batch selection, resumable transfer, metadata commit.

pub mod batch;
pub mod pipeline;

pub use batch::{PendingFile, select_files};
pub use pipeline::{UploadEvent, UploadService, UploadTarget};
