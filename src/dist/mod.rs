//! Contribution distribution: who did what kind of work.
//!
//! Every non-merge commit is classified into one of four categories
//! (refinement, new features, refactoring, maintenance) and bucketed by
//! author. The result is a three-level tree: root → category → author,
//! with authors past the per-category cutoff folded into an "Others"
//! leaf. Classification runs in chunks on a single-threaded runtime,
//! yielding between chunks; a newer input cancels an older pass.

pub mod accumulate;
pub mod aggregator;
pub mod category;
pub mod classify;
pub mod explore;
pub mod record;
mod report;
pub mod tree;
pub mod view;

#[cfg(test)]
pub(crate) mod fixtures;

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::git::GitRepo;
use crate::util::parse_since;
use accumulate::HostYield;
use aggregator::Aggregator;
use category::Category;
use classify::RuleClassifier;

/// Build the single-threaded runtime passes run on.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn Error>> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?)
}

type Prepared = (GitRepo, Config, Aggregator<RuleClassifier, HostYield>);

/// Shared setup for `dist` and `explore`: repository, config, classifier
/// and aggregator.
pub(crate) fn prepare(
    path: &Path,
    config_path: Option<&Path>,
) -> Result<Prepared, Box<dyn Error>> {
    let git_repo =
        GitRepo::open(path).map_err(|e| format!("not a git repository (or any parent): {e}"))?;
    let config = Config::load(config_path, git_repo.root())?;
    debug!(?config, "configuration loaded");

    let classifier = RuleClassifier::from_config(&config.classifier)?;
    let aggregator = Aggregator::new(
        classifier,
        HostYield::with_delay(config.yield_delay()),
        config.settings(),
    );
    Ok((git_repo, config, aggregator))
}

/// Run one distribution pass over the repository history and print the
/// overview, or the detail of `select` when given.
pub fn run(
    path: &Path,
    json: bool,
    since: Option<&str>,
    select: Option<&str>,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let since_ts = since.map(parse_since).transpose()?;
    let selection = select.map(str::parse::<Category>).transpose()?;

    let (git_repo, _, aggregator) = prepare(path, config_path)?;
    let records: Arc<[_]> = git_repo.contributions(since_ts)?.into();

    runtime()?.block_on(aggregator.submit(records));
    aggregator.sync_external(selection);

    let tree = aggregator.tree();
    if json {
        return report::print_json(tree.as_deref(), aggregator.view());
    }

    match tree {
        Some(tree) => report::print_view(&tree, aggregator.view()),
        None => println!("No commits found for distribution analysis."),
    }
    Ok(())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
