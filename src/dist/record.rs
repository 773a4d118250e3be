use std::path::PathBuf;

use serde::Serialize;

/// One unit of work attributed to an author: a single non-merge commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributionRecord {
    pub id: String,
    /// Author identifier (lower-cased e-mail); buckets are keyed on this.
    pub author: String,
    pub author_name: String,
    pub timestamp: i64,
    pub additions: usize,
    pub deletions: usize,
    pub files: Vec<PathBuf>,
}

impl ContributionRecord {
    pub fn lines_changed(&self) -> usize {
        self.additions + self.deletions
    }
}
