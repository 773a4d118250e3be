//! Interactive drill-down over the distribution, driven by stdin.

use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::accumulate::HostYield;
use super::aggregator::{Aggregator, SubmitOutcome};
use super::category::Category;
use super::classify::RuleClassifier;
use super::record::ContributionRecord;
use super::{prepare, report, runtime};
use crate::cache::TtlCache;
use crate::git::GitRepo;
use crate::util::parse_since;

const HELP: &str = "\
commands:
  down <category>         show one category's authors
  up                      back to the overview
  select <category|none>  set the selection as an outside controller would
  refresh                 reload history and rebuild
  show                    print the current view
  quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Down(Category),
    Up,
    Select(Option<Category>),
    Refresh,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match (verb, arg) {
        ("down", Some(c)) => Command::Down(c.parse()?),
        ("down", None) => return Err("usage: down <category>".into()),
        ("up", _) => Command::Up,
        ("select", Some("none")) => Command::Select(None),
        ("select", Some(c)) => Command::Select(Some(c.parse()?)),
        ("select", None) => return Err("usage: select <category|none>".into()),
        ("refresh", _) => Command::Refresh,
        ("show", _) => Command::Show,
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit" | "q", _) => Command::Quit,
        (other, _) => return Err(format!("unknown command: {other:?} (try help)")),
    };
    Ok(Some(command))
}

type HistoryKey = (Option<String>, Option<i64>);

/// State of one `explore` run: the repository, its aggregator and a
/// history cache keyed by HEAD and the `--since` cutoff.
pub struct Session {
    git_repo: GitRepo,
    aggregator: Aggregator<RuleClassifier, HostYield>,
    history: TtlCache<HistoryKey, Arc<[ContributionRecord]>>,
    last_key: Option<HistoryKey>,
    since: Option<i64>,
    runtime: Runtime,
}

impl Session {
    pub fn open(
        path: &Path,
        since: Option<&str>,
        config_path: Option<&Path>,
    ) -> Result<Self, Box<dyn Error>> {
        let since = since.map(parse_since).transpose()?;
        let (git_repo, config, aggregator) = prepare(path, config_path)?;
        Ok(Self {
            git_repo,
            aggregator,
            history: TtlCache::new(config.cache_ttl()),
            last_key: None,
            since,
            runtime: runtime()?,
        })
    }

    #[cfg(test)]
    pub fn aggregator(&self) -> &Aggregator<RuleClassifier, HostYield> {
        &self.aggregator
    }

    fn load_history(&mut self) -> Result<Arc<[ContributionRecord]>, Box<dyn Error>> {
        let key = (self.git_repo.head_id(), self.since);
        if let Some(records) = self.history.get(&key) {
            return Ok(records);
        }
        // an entry for an older HEAD is never looked up again
        if let Some(previous) = self.last_key.take()
            && previous != key
        {
            self.history.invalidate(&previous);
        }
        let records: Arc<[ContributionRecord]> = self.git_repo.contributions(self.since)?.into();
        self.history.insert(key.clone(), Arc::clone(&records));
        self.last_key = Some(key);
        debug!(
            records = records.len(),
            cached = self.history.len(),
            "history loaded"
        );
        Ok(records)
    }

    pub fn refresh(&mut self) -> Result<SubmitOutcome, Box<dyn Error>> {
        let records = self.load_history()?;
        Ok(self.runtime.block_on(self.aggregator.submit(records)))
    }

    pub fn show(&self) {
        match self.aggregator.tree() {
            Some(tree) => report::print_view(&tree, self.aggregator.view()),
            None if self.aggregator.is_loading() => println!("(loading)"),
            None => println!("No commits found for distribution analysis."),
        }
    }

    /// Apply one command. Returns `false` once the session should end.
    pub fn execute(&mut self, command: Command) -> Result<bool, Box<dyn Error>> {
        match command {
            Command::Down(category) => self.aggregator.drill_down(category),
            Command::Up => self.aggregator.drill_up(),
            Command::Select(selection) => {
                self.aggregator.sync_external(selection);
            }
            Command::Refresh => {
                if self.refresh()? == SubmitOutcome::Reused {
                    println!("(history unchanged in size, keeping previous result)");
                }
            }
            Command::Show => {}
            Command::Help => {
                println!("{HELP}");
                return Ok(true);
            }
            Command::Quit => return Ok(false),
        }
        self.show();
        Ok(true)
    }
}

/// Load the distribution, then read commands from stdin until `quit` or EOF.
pub fn run(
    path: &Path,
    since: Option<&str>,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let mut session = Session::open(path, since, config_path)?;
    session.refresh()?;
    session.show();
    println!("{HELP}");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_command(&line) {
            Ok(Some(command)) => {
                if !session.execute(command)? {
                    break;
                }
            }
            Ok(None) => {}
            Err(msg) => {
                warn!(input = %line.trim(), "rejected command");
                eprintln!("{msg}");
            }
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "explore_test.rs"]
mod tests;
