use std::cell::{Cell, RefCell};
use std::sync::Arc;

use tracing::debug;

use super::accumulate::{CancelToken, DEFAULT_CHUNK_SIZE, Immediate, YieldPoint, accumulate};
use super::category::Category;
use super::classify::Classifier;
use super::record::ContributionRecord;
use super::tree::{DEFAULT_MAX_LEAVES, TreeNode, build_tree};
use super::view::{Navigator, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub chunk_size: usize,
    pub max_leaves: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_leaves: DEFAULT_MAX_LEAVES,
        }
    }
}

/// What a call to [`Aggregator::submit`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was empty; the tree was cleared without running a pass.
    Empty,
    /// Input had the same length as the last processed input; the previous
    /// tree was kept.
    Reused,
    /// The pass completed and its tree replaced the previous one.
    Published,
    /// A later submission superseded this pass; nothing was written.
    Superseded,
}

#[derive(Default)]
struct Published {
    tree: Option<Arc<TreeNode>>,
    processed_len: usize,
}

/// Releases the in-flight slot when a pass ends without publishing,
/// including when its future is dropped mid-pass. A slot already taken by
/// a newer pass is left alone.
struct PassGuard<'a> {
    token: CancelToken,
    in_flight: &'a RefCell<Option<CancelToken>>,
    input_len: &'a Cell<usize>,
    published: &'a RefCell<Published>,
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        let current = self
            .in_flight
            .borrow()
            .as_ref()
            .is_some_and(|t| t.same_as(&self.token));
        if current {
            self.in_flight.replace(None);
            // the abandoned input never reached the tree
            self.input_len.set(self.published.borrow().processed_len);
        }
    }
}

/// Turns successive record inputs into a published distribution tree and
/// tracks drill-down navigation over it.
///
/// Meant for a single-threaded host: `submit` takes `&self`, so a newer
/// submission can start while an older one is suspended between chunks.
/// Starting a pass cancels the one in flight; only the latest pass
/// publishes.
pub struct Aggregator<C, Y = Immediate> {
    classifier: C,
    yielder: Y,
    settings: Settings,
    nav: RefCell<Navigator>,
    published: RefCell<Published>,
    input_len: Cell<usize>,
    in_flight: RefCell<Option<CancelToken>>,
}

impl<C, Y> Aggregator<C, Y>
where
    C: Classifier,
    Y: YieldPoint,
{
    pub fn new(classifier: C, yielder: Y, settings: Settings) -> Self {
        Self {
            classifier,
            yielder,
            settings,
            nav: RefCell::new(Navigator::new()),
            published: RefCell::new(Published::default()),
            input_len: Cell::new(0),
            in_flight: RefCell::new(None),
        }
    }

    pub async fn submit(&self, records: Arc<[ContributionRecord]>) -> SubmitOutcome {
        let token = CancelToken::new();
        if let Some(previous) = self.in_flight.replace(Some(token.clone())) {
            previous.cancel();
        }
        self.input_len.set(records.len());

        if records.is_empty() {
            self.in_flight.replace(None);
            self.published.replace(Published::default());
            return SubmitOutcome::Empty;
        }

        // Length is the only thing compared; same-length inputs with
        // different contents keep the old tree.
        let reusable = {
            let published = self.published.borrow();
            published.tree.is_some() && published.processed_len == records.len()
        };
        if reusable {
            debug!(records = records.len(), "input size unchanged, reusing tree");
            self.in_flight.replace(None);
            return SubmitOutcome::Reused;
        }

        debug!(
            records = records.len(),
            chunk_size = self.settings.chunk_size,
            "pass started"
        );
        let _guard = PassGuard {
            token: token.clone(),
            in_flight: &self.in_flight,
            input_len: &self.input_len,
            published: &self.published,
        };
        let result = accumulate(
            &records,
            &self.classifier,
            self.settings.chunk_size,
            &token,
            &self.yielder,
        )
        .await;

        let buckets = match result {
            Ok(buckets) if !token.is_cancelled() => buckets,
            _ => {
                debug!(records = records.len(), "pass superseded");
                return SubmitOutcome::Superseded;
            }
        };

        let dropped = buckets.dropped();
        let tree = build_tree(buckets, self.settings.max_leaves);
        debug!(
            records = records.len(),
            counted = tree.value,
            dropped,
            "pass published"
        );
        self.published.replace(Published {
            tree: Some(Arc::new(tree)),
            processed_len: records.len(),
        });
        self.in_flight.replace(None);
        SubmitOutcome::Published
    }

    pub fn tree(&self) -> Option<Arc<TreeNode>> {
        self.published.borrow().tree.clone()
    }

    /// Input is present but no tree reflects it yet, or a pass is running.
    pub fn is_loading(&self) -> bool {
        self.input_len.get() > 0
            && (self.published.borrow().tree.is_none() || self.in_flight.borrow().is_some())
    }

    pub fn view(&self) -> ViewState {
        self.nav.borrow().state()
    }

    pub fn drill_down(&self, category: Category) {
        self.nav.borrow_mut().drill_down(category);
    }

    pub fn drill_up(&self) {
        self.nav.borrow_mut().drill_up();
    }

    pub fn sync_external(&self, selection: Option<Category>) -> bool {
        self.nav.borrow_mut().sync_external(selection)
    }
}

#[cfg(test)]
#[path = "aggregator_test.rs"]
mod tests;
