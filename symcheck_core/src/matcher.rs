//! Symptom matching and ranking.
//!
//! The pipeline for one query:
//!
//! 1. validate and sanitize the raw text ([`crate::query::validate_query`])
//! 2. tokenize into normalized terms
//! 3. resolve terms to catalog columns (exact, then substring)
//! 4. keep the rows where every resolved column is truthy
//! 5. count informative labels among those rows and rank them
//! 6. look up remedies and a specialty for the top label
//!
//! No statistics are involved: confidence is the share of matching rows
//! carrying a label.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::dataset::{CatalogEntry, Dataset, SymptomCatalog};
use crate::error::MatchError;
use crate::lookup::LookupTable;
use crate::query::{QueryLimits, tokenize, validate_query};
use crate::tables::{DEFAULT_SPECIALTY, default_remedy_table, default_specialty_table};

/// Tunables for matching and recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherSettings {
    #[serde(default)]
    pub limits: QueryLimits,
    /// Maximum number of ranked labels returned
    #[serde(default = "MatcherSettings::default_max_results")]
    pub max_results: usize,
    /// Runner-up labels stored with each history record
    #[serde(default = "MatcherSettings::default_max_alternatives")]
    pub max_alternatives: usize,
    /// Doctors recommended per query
    #[serde(default = "MatcherSettings::default_doctors_per_specialty")]
    pub doctors_per_specialty: usize,
    #[serde(default = "MatcherSettings::default_specialty")]
    pub default_specialty: String,
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            limits: QueryLimits::default(),
            max_results: Self::default_max_results(),
            max_alternatives: Self::default_max_alternatives(),
            doctors_per_specialty: Self::default_doctors_per_specialty(),
            default_specialty: Self::default_specialty(),
        }
    }
}

impl MatcherSettings {
    const fn default_max_results() -> usize {
        20
    }

    const fn default_max_alternatives() -> usize {
        5
    }

    const fn default_doctors_per_specialty() -> usize {
        2
    }

    fn default_specialty() -> String {
        DEFAULT_SPECIALTY.to_string()
    }
}

/// Everything a matcher reads, built once and shared.
#[derive(Debug, Clone)]
pub struct MatcherContext {
    pub dataset: Arc<Dataset>,
    pub remedies: LookupTable<Vec<String>>,
    pub specialties: LookupTable<String>,
    pub settings: MatcherSettings,
}

impl MatcherContext {
    /// Context with the built-in remedy and specialty tables.
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            remedies: default_remedy_table(),
            specialties: default_specialty_table(),
            settings: MatcherSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: MatcherSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Specialty for a label; unknown labels get the configured default.
    fn specialty_for(&self, label: &str) -> String {
        let hit = self.specialties.lookup(label);
        if hit.is_fallback() {
            self.settings.default_specialty.clone()
        } else {
            hit.value.clone()
        }
    }
}

/// Outcome of mapping query terms onto the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnResolution {
    /// Resolved columns without duplicates, in first-resolved order
    pub columns: Vec<CatalogEntry>,
    /// Terms that matched no column
    pub unresolved: Vec<String>,
}

impl ColumnResolution {
    #[must_use]
    pub fn column_indices(&self) -> Vec<usize> {
        self.columns.iter().map(|c| c.column).collect()
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Resolve normalized terms against a catalog.
#[must_use]
pub fn resolve_columns(catalog: &SymptomCatalog, tokens: &[String]) -> ColumnResolution {
    let mut resolution = ColumnResolution::default();
    for token in tokens {
        match catalog.resolve(token) {
            Some(entry) => {
                if !resolution.columns.iter().any(|c| c.column == entry.column) {
                    resolution.columns.push(entry.clone());
                }
            }
            None => resolution.unresolved.push(token.clone()),
        }
    }
    resolution
}

/// A ranked disease label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Share of labelled matching rows, in `[0, 1]`
    pub confidence: f64,
    /// Number of matching rows with this label
    pub count: usize,
}

/// Count labels and rank them by frequency.
///
/// Ties keep first-seen order. Confidence is relative to the number of
/// labels given, so the full ranking sums to one.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rank<'a, I>(labels: I, max_results: usize) -> Vec<Prediction>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut total = 0_usize;

    for label in labels {
        total += 1;
        if let Some(&i) = index.get(label) {
            order[i].1 += 1;
        } else {
            index.insert(label, order.len());
            order.push((label, 1));
        }
    }

    if total == 0 {
        return Vec::new();
    }

    // stable: equal counts stay in first-seen order
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.truncate(max_results);

    order
        .into_iter()
        .map(|(label, count)| Prediction {
            label: label.to_string(),
            confidence: count as f64 / total as f64,
            count,
        })
        .collect()
}

/// Result of matching one query against the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    /// Sanitized query text
    pub query: String,
    pub matched_columns: Vec<String>,
    pub unresolved: Vec<String>,
    /// Rows satisfying every matched column
    pub matching_rows: usize,
    pub predictions: Vec<Prediction>,
    /// Remedies for the top prediction, empty when there is none
    pub remedies: Vec<String>,
    /// Specialty for the top prediction, `None` when there is none
    pub specialty: Option<String>,
}

impl Diagnosis {
    #[must_use]
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }

    /// Predictions after the top one, at most `n`.
    #[must_use]
    pub fn runners_up(&self, n: usize) -> &[Prediction] {
        let rest = self.predictions.get(1..).unwrap_or_default();
        &rest[..rest.len().min(n)]
    }
}

/// Stateless matcher over an injected [`MatcherContext`].
#[derive(Debug, Clone)]
pub struct SymptomMatcher {
    context: Arc<MatcherContext>,
}

impl SymptomMatcher {
    #[must_use]
    pub const fn new(context: Arc<MatcherContext>) -> Self {
        Self { context }
    }

    #[must_use]
    pub fn context(&self) -> &MatcherContext {
        &self.context
    }

    /// Run the full matching pipeline for a raw query.
    pub fn diagnose(&self, raw: &str) -> Result<Diagnosis, MatchError> {
        let ctx = &self.context;
        let query = validate_query(raw, ctx.settings.limits)?;
        let tokens = tokenize(&query);

        let resolution = resolve_columns(ctx.dataset.catalog(), &tokens);
        if resolution.columns.is_empty() {
            return Err(MatchError::NoMatchingColumns(resolution.unresolved));
        }
        debug!(
            "Resolved {:?}, unresolved {:?}",
            resolution.column_names(),
            resolution.unresolved
        );

        let rows = ctx.dataset.matching_rows(&resolution.column_indices());
        let predictions = rank(
            rows.iter().filter_map(|r| r.informative_label()),
            ctx.settings.max_results,
        );
        debug!(
            "{} matching rows, {} ranked labels",
            rows.len(),
            predictions.len()
        );

        let (remedies, specialty) = predictions.first().map_or_else(
            || (Vec::new(), None),
            |top| {
                (
                    ctx.remedies.get(&top.label).clone(),
                    Some(ctx.specialty_for(&top.label)),
                )
            },
        );

        Ok(Diagnosis {
            query,
            matched_columns: resolution.column_names(),
            unresolved: resolution.unresolved,
            matching_rows: rows.len(),
            predictions,
            remedies,
            specialty,
        })
    }
}
