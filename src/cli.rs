//! CLI argument definitions for the `cdist` command.
//!
//! Defines all subcommands, their arguments, and long help text
//! using the `clap` derive macros.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Top-level CLI parser with a single subcommand selector.
#[derive(Parser)]
#[command(name = "cdist", version, about = "Contribution distribution by kind of work")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by the history-reading commands.
#[derive(Args)]
pub struct HistoryArgs {
    /// Repository to analyze (default: current directory)
    pub path: Option<PathBuf>,

    /// Only consider commits since this long ago (e.g. 30d, 6m, 1y)
    #[arg(long)]
    pub since: Option<String>,

    /// Config file (default: .cdist.toml at the repository root, if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show how commits split into refinement, new, refactoring and maintenance work
    #[command(long_about = "\
Show how commits split into kinds of work, and who did each kind.

Every non-merge commit reachable from HEAD is classified into one category:

  Maintenance   every touched file matches a maintenance glob
                (docs, lock files, CI config, ... configurable)
  Refinement    small change: added + deleted lines <= 20
  New Features  additions make up >= 75% of changed lines
  Refactoring   everything else

Within each category authors are ranked by commit count. Only the top 20
are listed; the rest are folded into a single \"Others\" row.

Thresholds, globs, chunk size and the author cutoff can be set in
.cdist.toml at the repository root:

  chunk_size = 50
  max_leaves = 20

  [classifier]
  refinement_max_lines = 20
  new_ratio = 0.75
  maintenance_globs = [\"**/*.md\", \".github/**\"]

Examples:
  cdist dist                          # overview of the current repository
  cdist dist --since 6m               # last six months only
  cdist dist --select maintenance     # authors of maintenance work
  cdist dist --json                   # full tree as JSON")]
    Dist {
        #[command(flatten)]
        history: HistoryArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Show one category's authors (refinement, new, refactoring, maintenance)
        #[arg(long)]
        select: Option<String>,
    },

    /// Interactively drill into the distribution (reads commands from stdin)
    Explore {
        #[command(flatten)]
        history: HistoryArgs,
    },

    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}
