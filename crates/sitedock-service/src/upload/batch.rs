//! Pending upload batches and the selection-time size filter.

use bytes::Bytes;
use tracing::debug;

/// A user-selected local file awaiting upload.
#[derive(Debug, Clone)]
pub struct PendingFile {
    /// The file name (including extension).
    pub name: String,
    /// The file content.
    pub data: Bytes,
}

impl PendingFile {
    /// Create a pending file from a name and its bytes.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// The file size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Filter a picked selection down to files within the size cap.
///
/// Oversized files are silently excluded — this is a selection-time
/// filter, not an error. A file of exactly `max_size_bytes` is accepted.
pub fn select_files(
    picked: impl IntoIterator<Item = PendingFile>,
    max_size_bytes: u64,
) -> Vec<PendingFile> {
    picked
        .into_iter()
        .filter(|file| {
            let within = file.size_bytes() <= max_size_bytes;
            if !within {
                debug!(
                    name = %file.name,
                    size = file.size_bytes(),
                    max = max_size_bytes,
                    "Excluding oversized file from batch"
                );
            }
            within
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_at_cap_is_accepted() {
        let cap = 64;
        let at_cap = PendingFile::new("exact.bin", vec![0u8; 64]);
        let over_cap = PendingFile::new("over.bin", vec![0u8; 65]);

        let selected = select_files([at_cap, over_cap], cap);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "exact.bin");
    }

    #[test]
    fn test_empty_selection_stays_empty() {
        assert!(select_files([], 1024).is_empty());
    }
}
