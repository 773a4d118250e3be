use super::*;
use std::fs;

fn create_test_repo() -> (tempfile::TempDir, Repository) {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::init(dir.path()).unwrap();

    // Configure identity for commits
    let mut config = repo.config().unwrap();
    config.set_str("user.name", "Test").unwrap();
    config.set_str("user.email", "test@test.com").unwrap();

    (dir, repo)
}

fn commit_as(
    repo: &Repository,
    (name, email): (&str, &str),
    files: &[(&str, &str)],
    message: &str,
    epoch: i64,
) -> git2::Oid {
    let sig = git2::Signature::new(name, email, &git2::Time::new(epoch, 0)).unwrap();
    let mut index = repo.index().unwrap();

    for (path, content) in files {
        let full_path = repo.workdir().unwrap().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
        index.add_path(Path::new(path)).unwrap();
    }

    index.write().unwrap();
    let tree_oid = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_oid).unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn make_commit_at(
    repo: &Repository,
    files: &[(&str, &str)],
    message: &str,
    epoch: i64,
) -> git2::Oid {
    commit_as(repo, ("Test", "test@test.com"), files, message, epoch)
}

#[test]
fn test_open_repo() {
    let (dir, _repo) = create_test_repo();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert_eq!(
        git_repo.root().canonicalize().unwrap(),
        dir.path().canonicalize().unwrap()
    );
}

#[test]
fn test_open_from_subdirectory() {
    let (dir, _repo) = create_test_repo();
    let sub = dir.path().join("src/nested");
    fs::create_dir_all(&sub).unwrap();
    assert!(GitRepo::open(&sub).is_ok());
}

#[test]
fn test_open_not_repo() {
    let dir = tempfile::tempdir().unwrap();
    // Don't init git — just a plain directory
    let sub = dir.path().join("not_a_repo");
    fs::create_dir_all(&sub).unwrap();
    assert!(GitRepo::open(&sub).is_err());
}

#[test]
fn test_contributions_oldest_first() {
    let (dir, repo) = create_test_repo();
    let first = make_commit_at(&repo, &[("a.rs", "fn a() {}\n")], "add a", 1_000_000);
    let second = make_commit_at(&repo, &[("b.rs", "fn b() {}\n")], "add b", 2_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let records = git_repo.contributions(None).unwrap();

    let ids: Vec<String> = records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, [first.to_string(), second.to_string()]);
    assert_eq!(records[0].timestamp, 1_000_000);
}

#[test]
fn test_contributions_line_stats() {
    let (dir, repo) = create_test_repo();
    make_commit_at(&repo, &[("a.rs", "one\ntwo\nthree\n")], "add a", 1_000_000);
    make_commit_at(
        &repo,
        &[("a.rs", "one\nTWO\nthree\nfour\n"), ("docs/x.md", "hi\n")],
        "edit a",
        2_000_000,
    );

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let records = git_repo.contributions(None).unwrap();

    assert_eq!(records[0].additions, 3);
    assert_eq!(records[0].deletions, 0);
    assert_eq!(records[0].files, [PathBuf::from("a.rs")]);

    // TWO replaces two (+1 -1), four added (+1), docs/x.md (+1)
    assert_eq!(records[1].additions, 3);
    assert_eq!(records[1].deletions, 1);
    assert_eq!(records[1].files.len(), 2);
    assert!(records[1].files.contains(&PathBuf::from("docs/x.md")));
}

#[test]
fn test_contributions_author_identity() {
    let (dir, repo) = create_test_repo();
    commit_as(
        &repo,
        ("Alice Liddell", "Alice@Example.COM"),
        &[("a.rs", "x\n")],
        "add a",
        1_000_000,
    );

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let records = git_repo.contributions(None).unwrap();
    assert_eq!(records[0].author, "alice@example.com");
    assert_eq!(records[0].author_name, "Alice Liddell");
}

#[test]
fn test_contributions_since() {
    let (dir, repo) = create_test_repo();

    make_commit_at(&repo, &[("a.rs", "v1")], "first", 1_000_000);
    make_commit_at(&repo, &[("b.rs", "v1")], "second", 2_000_000);

    let git_repo = GitRepo::open(dir.path()).unwrap();
    // Filter: only commits at or after 1_500_000 → only the second commit
    let records = git_repo.contributions(Some(1_500_000)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].files, [PathBuf::from("b.rs")]);
}

#[test]
fn test_merge_commits_skipped() {
    let (dir, repo) = create_test_repo();
    let base = make_commit_at(&repo, &[("a.rs", "v1")], "base", 1_000_000);
    let main_tip = make_commit_at(&repo, &[("b.rs", "v1")], "main", 2_000_000);

    // Side commit on top of base, then a merge of both tips
    let sig = git2::Signature::new("Test", "test@test.com", &git2::Time::new(3_000_000, 0))
        .unwrap();
    let base_commit = repo.find_commit(base).unwrap();
    let side = repo
        .commit(None, &sig, &sig, "side", &base_commit.tree().unwrap(), &[&base_commit])
        .unwrap();
    let main_commit = repo.find_commit(main_tip).unwrap();
    let side_commit = repo.find_commit(side).unwrap();
    repo.commit(
        Some("HEAD"),
        &sig,
        &sig,
        "merge",
        &main_commit.tree().unwrap(),
        &[&main_commit, &side_commit],
    )
    .unwrap();

    let git_repo = GitRepo::open(dir.path()).unwrap();
    let records = git_repo.contributions(None).unwrap();
    assert_eq!(records.len(), 3, "base, main and side; merge skipped");
    assert!(records.iter().all(|r| r.id != git_repo.head_id().unwrap()));
}

#[test]
fn test_empty_repo() {
    let (dir, _repo) = create_test_repo();
    let git_repo = GitRepo::open(dir.path()).unwrap();
    assert!(git_repo.head_id().is_none());
    assert!(git_repo.contributions(None).unwrap().is_empty());
}
