use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;

use super::category::Category;
use super::record::ContributionRecord;
use crate::config::{ClassifierConfig, ConfigError};

#[derive(Debug, Error, PartialEq)]
pub enum ClassifyError {
    #[error("commit {0} touches no files")]
    NoFiles(String),

    #[error("commit {id} could not be classified: {reason}")]
    Rejected { id: String, reason: String },
}

/// Maps one record to its category.
///
/// Called once per record during accumulation. An `Err` removes that record
/// from the distribution without affecting the rest of the pass.
pub trait Classifier {
    fn classify(&self, record: &ContributionRecord) -> Result<Category, ClassifyError>;
}

impl<F> Classifier for F
where
    F: Fn(&ContributionRecord) -> Result<Category, ClassifyError>,
{
    fn classify(&self, record: &ContributionRecord) -> Result<Category, ClassifyError> {
        self(record)
    }
}

/// Heuristic classifier driven by touched paths and line stats.
///
/// Rules, first match wins:
///   every touched file is a maintenance path  -> Maintenance
///   no line changes (binary or mode only)     -> rejected
///   lines changed <= refinement_max_lines     -> Refinement
///   additions share >= new_ratio              -> New
///   otherwise                                 -> Refactoring
pub struct RuleClassifier {
    maintenance: GlobSet,
    refinement_max_lines: usize,
    new_ratio: f64,
}

impl RuleClassifier {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &config.maintenance_globs {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::Glob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let maintenance = builder.build().map_err(|source| ConfigError::Glob {
            pattern: config.maintenance_globs.join(", "),
            source,
        })?;

        Ok(Self {
            maintenance,
            refinement_max_lines: config.refinement_max_lines,
            new_ratio: config.new_ratio,
        })
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, record: &ContributionRecord) -> Result<Category, ClassifyError> {
        if record.files.is_empty() {
            return Err(ClassifyError::NoFiles(record.id.clone()));
        }

        if record.files.iter().all(|f| self.maintenance.is_match(f)) {
            return Ok(Category::Maintenance);
        }

        let changed = record.lines_changed();
        if changed == 0 {
            return Err(ClassifyError::Rejected {
                id: record.id.clone(),
                reason: "no line changes".to_string(),
            });
        }
        if changed <= self.refinement_max_lines {
            return Ok(Category::Refinement);
        }

        let additions_share = record.additions as f64 / changed as f64;
        if additions_share >= self.new_ratio {
            Ok(Category::New)
        } else {
            Ok(Category::Refactoring)
        }
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
