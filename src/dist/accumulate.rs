//! Chunked accumulation of records into per-category author buckets.
//!
//! Records are classified in fixed-size chunks. Between chunks the pass
//! awaits an injected [`YieldPoint`] so a single-threaded host can run
//! other work, and checks a [`CancelToken`] so a superseded pass stops
//! before touching the next chunk.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::category::Category;
use super::classify::Classifier;
use super::record::ContributionRecord;

pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Cooperative cancellation flag shared between a pass and whoever
/// may supersede it. Checked once per chunk boundary.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Both tokens belong to the same pass.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("accumulation pass cancelled")]
pub struct Cancelled;

/// Suspension point awaited between chunks.
pub trait YieldPoint {
    fn yield_now(&self) -> impl Future<Output = ()>;
}

/// Never suspends. Makes a pass run to completion in one poll.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl YieldPoint for Immediate {
    fn yield_now(&self) -> impl Future<Output = ()> {
        std::future::ready(())
    }
}

/// Hands control back to the tokio scheduler. A zero delay re-queues the
/// task immediately; a positive delay sleeps, giving queued work a bounded
/// window before the next chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostYield {
    pub delay: Duration,
}

impl HostYield {
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl YieldPoint for HostYield {
    fn yield_now(&self) -> impl Future<Output = ()> {
        let delay = self.delay;
        async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Records of one author within one category.
#[derive(Debug, Clone)]
pub struct AuthorBucket {
    pub author: String,
    pub author_name: String,
    pub records: Vec<ContributionRecord>,
}

/// Authors of one category in first-seen order.
#[derive(Debug, Default)]
pub struct AuthorBuckets {
    index: HashMap<String, usize>,
    authors: Vec<AuthorBucket>,
}

impl AuthorBuckets {
    fn push(&mut self, record: ContributionRecord) {
        match self.index.get(&record.author) {
            Some(&i) => self.authors[i].records.push(record),
            None => {
                self.index.insert(record.author.clone(), self.authors.len());
                self.authors.push(AuthorBucket {
                    author: record.author.clone(),
                    author_name: record.author_name.clone(),
                    records: vec![record],
                });
            }
        }
    }

    #[cfg(test)]
    pub fn authors(&self) -> &[AuthorBucket] {
        &self.authors
    }

    pub fn into_authors(self) -> Vec<AuthorBucket> {
        self.authors
    }

    pub fn record_count(&self) -> usize {
        self.authors.iter().map(|a| a.records.len()).sum()
    }
}

/// Category → author → records, with every category present.
#[derive(Debug, Default)]
pub struct BucketMap {
    categories: [AuthorBuckets; 4],
    dropped: usize,
}

impl BucketMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, record: ContributionRecord) {
        self.categories[category.index()].push(record);
    }

    #[cfg(test)]
    pub fn get(&self, category: Category) -> &AuthorBuckets {
        &self.categories[category.index()]
    }

    /// Consume the map, yielding buckets in canonical category order.
    pub fn into_categories(self) -> impl Iterator<Item = (Category, AuthorBuckets)> {
        Category::ALL.into_iter().zip(self.categories)
    }

    pub fn record_count(&self) -> usize {
        self.categories.iter().map(|c| c.record_count()).sum()
    }

    /// Records the classifier rejected.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

/// Classify `records` into a fresh [`BucketMap`], `chunk_size` records at a
/// time, awaiting `yielder` between chunks.
///
/// Returns `Err(Cancelled)` if `cancel` is set at any chunk boundary; the
/// partial buckets are discarded.
pub async fn accumulate<C, Y>(
    records: &[ContributionRecord],
    classifier: &C,
    chunk_size: usize,
    cancel: &CancelToken,
    yielder: &Y,
) -> Result<BucketMap, Cancelled>
where
    C: Classifier + ?Sized,
    Y: YieldPoint + ?Sized,
{
    let mut buckets = BucketMap::new();
    let mut chunks = records.chunks(chunk_size.max(1)).peekable();

    while let Some(chunk) = chunks.next() {
        if cancel.is_cancelled() {
            debug!(total = records.len(), "pass cancelled at chunk boundary");
            return Err(Cancelled);
        }

        for record in chunk {
            match classifier.classify(record) {
                Ok(category) => buckets.insert(category, record.clone()),
                Err(_) => buckets.dropped += 1,
            }
        }

        if chunks.peek().is_some() {
            yielder.yield_now().await;
        }
    }

    debug!(
        total = records.len(),
        kept = buckets.record_count(),
        dropped = buckets.dropped,
        "pass accumulated"
    );
    Ok(buckets)
}

#[cfg(test)]
#[path = "accumulate_test.rs"]
mod tests;
