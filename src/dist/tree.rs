use super::accumulate::{AuthorBucket, BucketMap};
use super::category::Category;
use super::record::ContributionRecord;

pub const DEFAULT_MAX_LEAVES: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Root,
    Category(Category),
    Author { author: String },
    /// Authors folded past the per-category cutoff.
    Others { authors: usize },
}

/// Node of the distribution tree: root → category → author / "Others".
///
/// `value` is a record count. For root and category nodes it is the sum of
/// the children's values; author leaves own their records, the "Others"
/// leaf carries only the count.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub value: usize,
    pub color: Option<&'static str>,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
    pub records: Vec<ContributionRecord>,
}

impl TreeNode {
    /// Look up a category node under the root.
    pub fn category(&self, category: Category) -> Option<&TreeNode> {
        self.children
            .iter()
            .find(|c| c.kind == NodeKind::Category(category))
    }

    pub fn is_others(&self) -> bool {
        matches!(self.kind, NodeKind::Others { .. })
    }
}

/// Turn a completed bucket map into the distribution tree.
///
/// Every category gets a node in canonical order, empty or not. Authors are
/// sorted by record count, descending; the sort is stable so equal counts
/// keep first-seen order. Past `max_leaves` authors, the remainder is
/// folded into one "Others" leaf.
pub fn build_tree(buckets: BucketMap, max_leaves: usize) -> TreeNode {
    let children: Vec<TreeNode> = buckets
        .into_categories()
        .map(|(category, authors)| category_node(category, authors.into_authors(), max_leaves))
        .collect();

    TreeNode {
        id: "root".to_string(),
        name: "Contributions".to_string(),
        value: children.iter().map(|c| c.value).sum(),
        color: None,
        kind: NodeKind::Root,
        children,
        records: Vec::new(),
    }
}

fn category_node(category: Category, authors: Vec<AuthorBucket>, max_leaves: usize) -> TreeNode {
    let mut leaves: Vec<TreeNode> = authors
        .into_iter()
        .map(|bucket| author_leaf(category, bucket))
        .collect();
    leaves.sort_by(|a, b| b.value.cmp(&a.value));

    if leaves.len() > max_leaves {
        let folded = leaves.split_off(max_leaves);
        let value = folded.iter().map(|l| l.value).sum();
        leaves.push(others_leaf(category, folded.len(), value));
    }

    TreeNode {
        id: category.id().to_string(),
        name: category.label().to_string(),
        value: leaves.iter().map(|l| l.value).sum(),
        color: Some(category.color()),
        kind: NodeKind::Category(category),
        children: leaves,
        records: Vec::new(),
    }
}

fn author_leaf(category: Category, bucket: AuthorBucket) -> TreeNode {
    TreeNode {
        id: format!("{}-{}", category.id(), bucket.author),
        name: bucket.author_name,
        value: bucket.records.len(),
        color: Some(category.color()),
        kind: NodeKind::Author {
            author: bucket.author,
        },
        children: Vec::new(),
        records: bucket.records,
    }
}

fn others_leaf(category: Category, authors: usize, value: usize) -> TreeNode {
    TreeNode {
        id: format!("{}-others", category.id()),
        name: format!("Others ({authors} authors)"),
        value,
        color: Some(category.color()),
        kind: NodeKind::Others { authors },
        children: Vec::new(),
        records: Vec::new(),
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tests;
