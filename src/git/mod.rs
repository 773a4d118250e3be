use std::error::Error;
use std::path::{Path, PathBuf};

use git2::{DiffOptions, ErrorCode, Repository, Sort};

use crate::dist::record::ContributionRecord;

pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

struct DiffStats {
    files: Vec<PathBuf>,
    additions: usize,
    deletions: usize,
}

impl GitRepo {
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error>> {
        let repo = Repository::discover(path)?;
        let root = repo
            .workdir()
            .ok_or("bare repositories are not supported")?
            .to_path_buf();
        Ok(Self { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Commit id HEAD points at, or `None` for a repository without commits.
    pub fn head_id(&self) -> Option<String> {
        self.repo
            .head()
            .ok()
            .and_then(|h| h.target())
            .map(|oid| oid.to_string())
    }

    /// One record per non-merge commit reachable from HEAD, oldest first.
    /// Commits older than `since` (unix seconds) are skipped.
    pub fn contributions(
        &self,
        since: Option<i64>,
    ) -> Result<Vec<ContributionRecord>, Box<dyn Error>> {
        if let Err(e) = self.repo.head()
            && e.code() == ErrorCode::UnbornBranch
        {
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(Sort::TIME | Sort::REVERSE)?;

        let mut records = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            // Skip merge commits
            if commit.parent_count() > 1 {
                continue;
            }

            let time = commit.time().seconds();
            if let Some(since_ts) = since
                && time < since_ts
            {
                continue;
            }

            let stats = self.diff_stats(&commit)?;
            let author = commit.author();
            let email = author.email().unwrap_or("unknown").to_lowercase();
            let name = author.name().unwrap_or(&email).to_string();

            records.push(ContributionRecord {
                id: oid.to_string(),
                author: email,
                author_name: name,
                timestamp: time,
                additions: stats.additions,
                deletions: stats.deletions,
                files: stats.files,
            });
        }

        Ok(records)
    }

    fn diff_stats(&self, commit: &git2::Commit) -> Result<DiffStats, Box<dyn Error>> {
        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };

        let mut opts = DiffOptions::new();
        let diff =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?;

        let files = diff
            .deltas()
            .filter_map(|delta| delta.new_file().path().map(Path::to_path_buf))
            .collect();
        let stats = diff.stats()?;

        Ok(DiffStats {
            files,
            additions: stats.insertions(),
            deletions: stats.deletions(),
        })
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
