use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of work a contribution represents.
///
/// The set is closed: every distribution tree carries exactly these four
/// categories, in the order of [`Category::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Refinement,
    New,
    Refactoring,
    Maintenance,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Refinement,
        Category::New,
        Category::Refactoring,
        Category::Maintenance,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Refinement => "refinement",
            Category::New => "new",
            Category::Refactoring => "refactoring",
            Category::Maintenance => "maintenance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Refinement => "Refinement",
            Category::New => "New Features",
            Category::Refactoring => "Refactoring",
            Category::Maintenance => "Maintenance",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::Refinement => "#4ade80",
            Category::New => "#60a5fa",
            Category::Refactoring => "#f97316",
            Category::Maintenance => "#a78bfa",
        }
    }

    /// Position in the canonical order; used to index per-category storage.
    pub fn index(&self) -> usize {
        match self {
            Category::Refinement => 0,
            Category::New => 1,
            Category::Refactoring => 2,
            Category::Maintenance => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.id() == wanted)
            .ok_or_else(|| {
                format!(
                    "unknown category: {s:?} (expected refinement, new, refactoring or maintenance)"
                )
            })
    }
}
