//! Attachment tree limits.

use serde::{Deserialize, Serialize};

/// Limits enforced on the folder/file tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum folder depth below the root (root is depth 0). Folder
    /// creation is refused once the prospective depth would exceed this.
    #[serde(default = "default_max_depth")]
    pub max_folder_depth: i32,
    /// Upper bound on nodes visited by a single recursive traversal
    /// (delete, archive export). Exceeding it fails loudly instead of
    /// hanging on corrupted or runaway trees.
    #[serde(default = "default_max_traversal")]
    pub max_traversal_nodes: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_folder_depth: default_max_depth(),
            max_traversal_nodes: default_max_traversal(),
        }
    }
}

fn default_max_depth() -> i32 {
    5
}

fn default_max_traversal() -> usize {
    10_000
}
