//! Record builders and a tag-driven classifier shared by the dist tests.

use std::path::PathBuf;

use super::category::Category;
use super::classify::ClassifyError;
use super::record::ContributionRecord;

/// A record whose single touched "file" is the category tag the
/// [`by_tag`] classifier reads back.
pub fn tagged(id: &str, author: &str, tag: &str) -> ContributionRecord {
    ContributionRecord {
        id: id.to_string(),
        author: format!("{}@x.com", author.to_lowercase()),
        author_name: author.to_string(),
        timestamp: 1_700_000_000,
        additions: 10,
        deletions: 2,
        files: vec![PathBuf::from(tag)],
    }
}

/// Classifies by the first touched path; anything that is not a category
/// id is rejected.
pub fn by_tag(record: &ContributionRecord) -> Result<Category, ClassifyError> {
    let tag = record
        .files
        .first()
        .and_then(|p| p.to_str())
        .unwrap_or_default();
    tag.parse::<Category>().map_err(|reason| ClassifyError::Rejected {
        id: record.id.clone(),
        reason,
    })
}

/// `count` records by `author`, all tagged `tag`.
pub fn many(author: &str, tag: &str, count: usize) -> Vec<ContributionRecord> {
    (0..count)
        .map(|i| tagged(&format!("{author}-{i}"), author, tag))
        .collect()
}

/// The five-record example: three "new" (A, A, B), one "maintenance",
/// one "refactoring".
pub fn five_records() -> Vec<ContributionRecord> {
    vec![
        tagged("c1", "A", "new"),
        tagged("c2", "B", "new"),
        tagged("c3", "A", "new"),
        tagged("c4", "C", "maintenance"),
        tagged("c5", "B", "refactoring"),
    ]
}

pub fn create_test_repo() -> (tempfile::TempDir, git2::Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = git2::Repository::init(dir.path()).unwrap();
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();
    (dir, repo)
}

/// Commit `files` (path, content) as `name <email>` on top of HEAD.
pub fn commit_as(repo: &git2::Repository, name: &str, files: &[(&str, &str)], epoch: i64) {
    let email = format!("{}@test.com", name.to_lowercase());
    let sig = git2::Signature::new(name, &email, &git2::Time::new(epoch, 0)).unwrap();
    let mut index = repo.index().unwrap();
    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&full_path, content).unwrap();
        index.add_path(std::path::Path::new(path)).unwrap();
    }
    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, "change", &tree, &parents)
        .unwrap();
}

/// Body of `n` numbered lines, for sizing additions.
pub fn lines(n: usize) -> String {
    (0..n).map(|i| format!("line {i}\n")).collect()
}

/// A repository with one commit per category:
/// alice adds a feature (New), bob tweaks it (Refinement), alice edits the
/// README (Maintenance), carol rewrites half the feature (Refactoring).
pub fn sample_repo() -> (tempfile::TempDir, git2::Repository) {
    let (dir, repo) = create_test_repo();
    commit_as(&repo, "Alice", &[("src/feature.rs", &lines(100))], 1_000_000);

    let mut tweaked = lines(100);
    tweaked.push_str("tweak\n");
    commit_as(&repo, "Bob", &[("src/feature.rs", &tweaked)], 2_000_000);

    commit_as(&repo, "Alice", &[("README.md", &lines(40))], 3_000_000);

    let rewritten: String = (0..100)
        .map(|i| {
            if i < 50 {
                format!("rewritten {i}\n")
            } else {
                format!("line {i}\n")
            }
        })
        .collect::<String>()
        + "tweak\n";
    commit_as(&repo, "Carol", &[("src/feature.rs", &rewritten)], 4_000_000);
    (dir, repo)
}
