use serde::Serialize;

use super::category::Category;
use super::tree::{NodeKind, TreeNode};
use super::view::{View, ViewState};
use crate::report_helpers::{max_name_width, pad_right, percent, print_json_stdout, separator};
use crate::util::format_date;

/// Authors represented under a category node, counting folded ones.
fn author_count(node: &TreeNode) -> usize {
    node.children
        .iter()
        .map(|c| match c.kind {
            NodeKind::Others { authors } => authors,
            _ => 1,
        })
        .sum()
}

/// Date of the leaf's newest record. Folded leaves carry no records.
fn last_commit(leaf: &TreeNode) -> String {
    if leaf.is_others() {
        return "-".to_string();
    }
    leaf.records
        .iter()
        .map(|r| r.timestamp)
        .max()
        .map(format_date)
        .unwrap_or_default()
}

pub fn print_overview(tree: &TreeNode) {
    let name_width = max_name_width(tree.children.iter().map(|c| c.name.as_str()), 8);
    let separator = separator((name_width + 32).max(50));

    println!("Contribution Distribution — {} commits", tree.value);
    println!("{separator}");
    println!(
        " {}  {:>8} {:>7} {:>8}",
        pad_right("Category", name_width),
        "Commits",
        "Share",
        "Authors"
    );
    println!("{separator}");

    for node in &tree.children {
        println!(
            " {}  {:>8} {:>6.1}% {:>8}",
            pad_right(&node.name, name_width),
            node.value,
            percent(node.value, tree.value),
            author_count(node)
        );
    }

    println!("{separator}");
}

pub fn print_detail(tree: &TreeNode, category: Category) {
    let Some(node) = tree.category(category) else {
        return;
    };

    if node.children.is_empty() {
        println!("{} — no commits", node.name);
        return;
    }

    let name_width = max_name_width(node.children.iter().map(|c| c.name.as_str()), 6);
    let separator = separator((name_width + 34).max(50));

    println!("{} — {} commits", node.name, node.value);
    println!("{separator}");
    println!(
        " {}  {:>8} {:>7}  {:<10}",
        pad_right("Author", name_width),
        "Commits",
        "Share",
        "Last"
    );
    println!("{separator}");

    for leaf in &node.children {
        let last = last_commit(leaf);
        println!(
            " {}  {:>8} {:>6.1}%  {:<10}",
            pad_right(&leaf.name, name_width),
            leaf.value,
            percent(leaf.value, node.value),
            last
        );
    }

    println!("{separator}");
}

/// Print whichever level `view` points at.
pub fn print_view(tree: &TreeNode, view: ViewState) {
    match view.selected() {
        Some(category) => print_detail(tree, category),
        None => print_overview(tree),
    }
}

#[derive(Serialize)]
struct JsonNode {
    id: String,
    name: String,
    kind: &'static str,
    value: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    folded_authors: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    commits: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode>,
}

impl From<&TreeNode> for JsonNode {
    fn from(node: &TreeNode) -> Self {
        let (kind, folded_authors) = match node.kind {
            NodeKind::Root => ("root", None),
            NodeKind::Category(_) => ("category", None),
            NodeKind::Author { .. } => ("author", None),
            NodeKind::Others { authors } => ("others", Some(authors)),
        };
        JsonNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind,
            value: node.value,
            color: node.color,
            folded_authors,
            commits: node.records.iter().map(|r| r.id.clone()).collect(),
            children: node.children.iter().map(JsonNode::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport {
    view: &'static str,
    selected: Option<Category>,
    tree: Option<JsonNode>,
}

fn json_report(tree: Option<&TreeNode>, view: ViewState) -> JsonReport {
    JsonReport {
        view: match view.view() {
            View::Overview => "overview",
            View::CategoryDetail => "category",
        },
        selected: view.selected(),
        tree: tree.map(JsonNode::from),
    }
}

pub fn print_json(
    tree: Option<&TreeNode>,
    view: ViewState,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json_stdout(&json_report(tree, view))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::accumulate::BucketMap;
    use crate::dist::fixtures::{five_records, many};
    use crate::dist::tree::build_tree;

    fn sample_tree() -> TreeNode {
        let mut buckets = BucketMap::new();
        for r in five_records() {
            let category = r.files[0].to_str().unwrap().parse().unwrap();
            buckets.insert(category, r);
        }
        for (i, mut r) in many("Zoë", "new", 3).into_iter().enumerate() {
            r.author = format!("z{i}@x.com");
            buckets.insert(Category::New, r);
        }
        build_tree(buckets, 2)
    }

    #[test]
    fn author_count_includes_folded() {
        let tree = sample_tree();
        // A, B, then three single-commit Zoë identities folded
        assert_eq!(author_count(tree.category(Category::New).unwrap()), 5);
        assert_eq!(author_count(tree.category(Category::Refinement).unwrap()), 0);
    }

    #[test]
    fn last_commit_per_leaf() {
        let tree = sample_tree();
        let new = tree.category(Category::New).unwrap();
        let newest = new.children[0].records.iter().map(|r| r.timestamp).max().unwrap();
        assert_eq!(last_commit(&new.children[0]), format_date(newest));
        assert_eq!(last_commit(&new.children[2]), "-");
    }

    #[test]
    fn print_overview_does_not_panic() {
        print_overview(&sample_tree());
    }

    #[test]
    fn print_detail_does_not_panic() {
        let tree = sample_tree();
        for c in Category::ALL {
            print_detail(&tree, c);
        }
    }

    #[test]
    fn print_view_follows_selection() {
        let tree = sample_tree();
        print_view(&tree, ViewState::overview());
        print_view(&tree, ViewState::detail(Category::Maintenance));
    }

    #[test]
    fn json_shape() {
        let tree = sample_tree();
        let report = json_report(Some(&tree), ViewState::detail(Category::New));
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["view"], "category");
        assert_eq!(value["selected"], "new");
        assert_eq!(value["tree"]["value"], 8);
        let new = &value["tree"]["children"][1];
        assert_eq!(new["id"], "new");
        assert_eq!(new["children"][0]["commits"][0], "c1");
        let others = &new["children"][2];
        assert_eq!(others["kind"], "others");
        assert_eq!(others["folded_authors"], 3);
        assert!(others.get("commits").is_none());
    }

    #[test]
    fn json_without_tree() {
        let value = serde_json::to_value(json_report(None, ViewState::overview())).unwrap();
        assert_eq!(value["view"], "overview");
        assert!(value["tree"].is_null());
        assert!(value["selected"].is_null());
    }

    #[test]
    fn print_json_does_not_panic() {
        print_json(Some(&sample_tree()), ViewState::overview()).unwrap();
    }
}
