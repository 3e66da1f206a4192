//! Symptom dataset: CSV parsing, the symptom catalog and row filtering.
//!
//! A dataset is a header row of column names followed by rows of
//! boolean-like symptom cells and one disease-label cell. Once loaded it is
//! never mutated; callers share it behind an `Arc`.

use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::query::normalize_name;

/// Column names that hold the disease label, in priority order.
pub const LABEL_ALIASES: [&str; 3] = ["Disease", "disease", "prognosis"];

/// Labels meaning "no finding", compared after trimming and lower-casing.
pub const UNINFORMATIVE_LABELS: [&str; 5] = ["no disease", "no_disease", "none", "nan", "no"];

/// Coerce a dataset cell to a boolean.
///
/// Integer-castable values are true when nonzero, then float-castable values
/// (NaN counts as false), then `1`/`true`/`yes`/`y` in any case. Everything
/// else is false.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn parse_boolish(value: &str) -> bool {
    let value = value.trim();
    if let Ok(i) = value.parse::<i64>() {
        return i != 0;
    }
    if let Ok(f) = value.parse::<f64>() {
        return !f.is_nan() && f != 0.0;
    }
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// Whether a label carries a real diagnosis.
#[must_use]
pub fn is_informative_label(label: &str) -> bool {
    let normalized = label.trim().to_lowercase();
    !normalized.is_empty() && !UNINFORMATIVE_LABELS.contains(&normalized.as_str())
}

/// One known symptom column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Column name as written in the header
    pub name: String,
    /// Normalized name used for comparisons
    pub normalized: String,
    /// Position of the column in each row
    pub column: usize,
}

/// Ordered list of symptom columns (every header column except label aliases).
#[derive(Debug, Clone, Default)]
pub struct SymptomCatalog {
    entries: Vec<CatalogEntry>,
}

impl SymptomCatalog {
    fn from_header(header: &[String]) -> Self {
        let entries = header
            .iter()
            .enumerate()
            .filter(|(_, name)| !LABEL_ALIASES.contains(&name.as_str()))
            .map(|(column, name)| CatalogEntry {
                name: name.clone(),
                normalized: normalize_name(name),
                column,
            })
            .filter(|entry| !entry.normalized.is_empty())
            .collect();
        Self { entries }
    }

    /// Resolve a normalized token to a column.
    ///
    /// An exact match wins; otherwise the first column (in header order)
    /// where either name contains the other.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<&CatalogEntry> {
        if token.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.normalized == token)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.normalized.contains(token) || token.contains(e.normalized.as_str()))
            })
    }

    /// Whether any of the given symptom names is a column of this catalog.
    #[must_use]
    pub fn overlaps(&self, known: &[String]) -> bool {
        known.iter().map(|k| normalize_name(k)).any(|k| {
            self.entries.iter().any(|e| e.normalized == k)
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read-only view of one dataset row.
#[derive(Debug, Clone, Copy)]
pub struct CaseRecord<'a> {
    cells: &'a [String],
    label_columns: &'a [usize],
}

impl<'a> CaseRecord<'a> {
    /// Raw cell value, empty when the row is shorter than the header.
    #[must_use]
    pub fn value(&self, column: usize) -> &'a str {
        self.cells.get(column).map_or("", String::as_str)
    }

    #[must_use]
    pub fn is_set(&self, column: usize) -> bool {
        parse_boolish(self.value(column))
    }

    /// First non-empty value among the label alias columns.
    #[must_use]
    pub fn label(&self) -> Option<&'a str> {
        self.label_columns
            .iter()
            .map(|c| self.value(*c).trim())
            .find(|v| !v.is_empty())
    }

    /// The label if it names an actual disease.
    #[must_use]
    pub fn informative_label(&self) -> Option<&'a str> {
        self.label().filter(|l| is_informative_label(l))
    }
}

/// Immutable in-memory symptom dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    label_columns: Vec<usize>,
    catalog: SymptomCatalog,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// A dataset with no columns; every query against it resolves nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dataset from a header and rows.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let label_columns = LABEL_ALIASES
            .iter()
            .filter_map(|alias| columns.iter().position(|c| c == alias))
            .collect();
        let catalog = SymptomCatalog::from_header(&columns);
        Self {
            columns,
            label_columns,
            catalog,
            rows,
        }
    }

    /// Read a CSV file.
    pub fn from_csv(path: &Path) -> anyhow::Result<Self> {
        let reader = reader_builder().from_path(path)?;
        Ok(Self::from_reader(reader)?)
    }

    /// Parse CSV text. The first record is the header.
    #[must_use]
    pub fn from_csv_str(content: &str) -> Self {
        let reader = reader_builder().from_reader(content.as_bytes());
        Self::from_reader(reader).unwrap_or_else(|e| {
            warn!("Unreadable CSV header: {e}");
            Self::empty()
        })
    }

    /// Header plus records. Blank records are skipped, short ones padded,
    /// unreadable ones logged and dropped.
    fn from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|c| c.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        if columns.iter().all(String::is_empty) {
            return Ok(Self::empty());
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    warn!("Skipping CSV record {}: {e}", index + 1);
                    continue;
                }
            };
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }

            let mut cells: Vec<String> = record.iter().map(ToString::to_string).collect();
            if cells.len() < columns.len() {
                cells.resize(columns.len(), String::new());
            }
            rows.push(cells);
        }

        Ok(Self::new(columns, rows))
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn has_label_column(&self) -> bool {
        !self.label_columns.is_empty()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = CaseRecord<'_>> {
        self.rows.iter().map(|cells| CaseRecord {
            cells,
            label_columns: &self.label_columns,
        })
    }

    /// Rows where every given column is truthy, in dataset order.
    #[must_use]
    pub fn matching_rows(&self, columns: &[usize]) -> Vec<CaseRecord<'_>> {
        self.rows
            .par_iter()
            .map(|cells| CaseRecord {
                cells,
                label_columns: &self.label_columns,
            })
            .filter(|record| columns.iter().all(|c| record.is_set(*c)))
            .collect()
    }
}

/// Rows may be shorter or longer than the header.
fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true);
    builder
}

/// Where to look for the dataset and how to pick among candidates.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    /// Directory the candidate file names are relative to
    pub dir: PathBuf,
    /// File names tried in priority order
    pub candidates: Vec<String>,
    /// Symptom names a usable dataset is expected to share
    pub known_symptoms: Vec<String>,
}

impl DatasetSource {
    /// Load the first candidate whose catalog overlaps the known symptoms.
    ///
    /// When no readable candidate overlaps, the first readable one is used.
    /// When nothing is readable the result is an empty dataset.
    #[must_use]
    pub fn load(&self) -> Dataset {
        let mut fallback: Option<(PathBuf, Dataset)> = None;

        for name in &self.candidates {
            let path = self.dir.join(name);
            if !path.is_file() {
                debug!("Dataset candidate not found: {}", path.display());
                continue;
            }

            let dataset = match Dataset::from_csv(&path) {
                Ok(d) => d,
                Err(e) => {
                    warn!("Failed to read dataset {}: {e}", path.display());
                    continue;
                }
            };

            if dataset.catalog().overlaps(&self.known_symptoms) {
                info!(
                    "Loaded dataset {} ({} rows, {} symptoms)",
                    path.display(),
                    dataset.row_count(),
                    dataset.catalog().len()
                );
                warn_if_unlabelled(&path, &dataset);
                return dataset;
            }

            if fallback.is_none() {
                fallback = Some((path, dataset));
            }
        }

        if let Some((path, dataset)) = fallback {
            info!(
                "No dataset shares known symptoms, using {} ({} rows, {} symptoms)",
                path.display(),
                dataset.row_count(),
                dataset.catalog().len()
            );
            warn_if_unlabelled(&path, &dataset);
            return dataset;
        }

        warn!(
            "No dataset found in {}, continuing with an empty dataset",
            self.dir.display()
        );
        Dataset::empty()
    }
}

fn warn_if_unlabelled(path: &Path, dataset: &Dataset) {
    if !dataset.has_label_column() {
        warn!(
            "Dataset {} has no label column ({}), no disease can be ranked",
            path.display(),
            LABEL_ALIASES.join(", ")
        );
    }
}

/// Symptom columns of the bundled sample dataset.
#[must_use]
pub fn default_known_symptoms() -> Vec<String> {
    [
        "fever",
        "cough",
        "headache",
        "fatigue",
        "nausea",
        "body_pain",
        "sore_throat",
        "runny_nose",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "fever,cough,Sore Throat,Disease\n1,0,yes,Flu\n0,1,no,Cold\n\n1,1,true,No Disease\n";

    #[test]
    fn boolish_integers() {
        assert!(parse_boolish("1"));
        assert!(parse_boolish("-3"));
        assert!(!parse_boolish("0"));
        assert!(!parse_boolish(" 0 "));
    }

    #[test]
    fn boolish_floats() {
        assert!(parse_boolish("0.5"));
        assert!(!parse_boolish("0.0"));
        assert!(!parse_boolish("NaN"));
    }

    #[test]
    fn boolish_words() {
        assert!(parse_boolish("TRUE"));
        assert!(parse_boolish("Yes"));
        assert!(parse_boolish("y"));
        assert!(!parse_boolish("false"));
        assert!(!parse_boolish("no"));
        assert!(!parse_boolish(""));
        assert!(!parse_boolish("maybe"));
    }

    #[test]
    fn informative_labels() {
        assert!(is_informative_label("Flu"));
        assert!(!is_informative_label("No Disease"));
        assert!(!is_informative_label(" NONE "));
        assert!(!is_informative_label("nan"));
        assert!(!is_informative_label(""));
    }

    #[test]
    fn parses_header_and_rows() {
        let dataset = Dataset::from_csv_str(SAMPLE);
        assert_eq!(dataset.columns().len(), 4);
        assert_eq!(dataset.row_count(), 3);
        assert!(dataset.has_label_column());

        let names: Vec<&str> = dataset.catalog().names().collect();
        assert_eq!(names, vec!["fever", "cough", "Sore Throat"]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let dataset = Dataset::from_csv_str("\u{feff}fever,Disease\n1,Flu\n");
        assert_eq!(dataset.columns()[0], "fever");
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let dataset = Dataset::from_csv_str("fever,Disease,note\n1,\"Flu, seasonal\",\"say \"\"hi\"\"\"\n");
        let record = dataset.records().next();
        assert_eq!(record.and_then(|r| r.label()), Some("Flu, seasonal"));
        assert_eq!(record.map(|r| r.value(2)), Some(r#"say "hi""#));
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let dataset = Dataset::from_csv_str("fever,Disease\n1,\"Flu\nseasonal\"\n0,Cold\n");
        assert_eq!(dataset.row_count(), 2);
        let labels: Vec<Option<&str>> = dataset.records().map(|r| r.label()).collect();
        assert_eq!(labels, vec![Some("Flu\nseasonal"), Some("Cold")]);
    }

    #[test]
    fn whitespace_only_records_are_skipped() {
        let dataset = Dataset::from_csv_str("fever,Disease\n1,Flu\n , \n0,Cold\n");
        assert_eq!(dataset.row_count(), 2);
    }

    #[test]
    fn blank_input_is_an_empty_dataset() {
        assert!(Dataset::from_csv_str("").is_empty());
        assert!(Dataset::from_csv_str("\n\n").is_empty());
    }

    #[test]
    fn reads_csv_files() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("symcheck-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(&path, "fever,cough,Disease\r\n1,1,Flu\r\n")?;
        let dataset = Dataset::from_csv(&path);
        std::fs::remove_file(&path)?;

        let dataset = dataset?;
        assert_eq!(dataset.columns(), ["fever", "cough", "Disease"]);
        assert_eq!(dataset.records().next().and_then(|r| r.label()), Some("Flu"));
        Ok(())
    }

    #[test]
    fn short_rows_are_padded() {
        let dataset = Dataset::from_csv_str("fever,cough,Disease\n1\n");
        let record = dataset.records().next();
        assert!(record.is_some_and(|r| r.value(2).is_empty() && r.label().is_none()));
    }

    #[test]
    fn resolve_prefers_exact_then_substring() {
        let dataset = Dataset::from_csv_str("high_fever,fever,sore_throat,Disease\n");
        let catalog = dataset.catalog();

        assert_eq!(catalog.resolve("fever").map(|e| e.column), Some(1));
        assert_eq!(catalog.resolve("throat").map(|e| e.column), Some(2));
        assert_eq!(catalog.resolve("sore_throat_pain").map(|e| e.column), Some(2));
        assert!(catalog.resolve("rash").is_none());
    }

    #[test]
    fn label_aliases_are_not_symptoms() {
        let dataset = Dataset::from_csv_str("fever,prognosis\n1,Flu\n");
        assert!(dataset.catalog().resolve("prognosis").is_none());
        assert_eq!(dataset.records().next().and_then(|r| r.label()), Some("Flu"));
    }

    #[test]
    fn label_falls_through_aliases_in_priority_order() {
        let dataset = Dataset::from_csv_str("fever,prognosis,Disease\n1,Cold,\n1,Cold,Flu\n");
        let labels: Vec<Option<&str>> = dataset.records().map(|r| r.label()).collect();
        assert_eq!(labels, vec![Some("Cold"), Some("Flu")]);
    }

    #[test]
    fn matching_rows_keep_dataset_order() {
        let dataset = Dataset::from_csv_str(SAMPLE);
        let rows = dataset.matching_rows(&[0]);
        let labels: Vec<&str> = rows.iter().filter_map(CaseRecord::label).collect();
        assert_eq!(labels, vec!["Flu", "No Disease"]);
    }

    #[test]
    fn overlap_uses_normalized_names() {
        let dataset = Dataset::from_csv_str(SAMPLE);
        assert!(dataset.catalog().overlaps(&["sore_throat".to_string()]));
        assert!(!dataset.catalog().overlaps(&["rash".to_string()]));
    }

    #[test]
    fn header_without_label_alias_has_no_label_column() {
        let dataset = Dataset::from_csv_str("fever,cough,Diagnosis\n1,1,Flu\n");
        assert!(!dataset.has_label_column());
        assert_eq!(dataset.records().next().and_then(|r| r.label()), None);
        assert_eq!(dataset.catalog().len(), 3);
    }

    #[test]
    fn missing_files_load_as_empty() {
        let source = DatasetSource {
            dir: PathBuf::from("/nonexistent/symcheck"),
            candidates: vec!["dataset.csv".to_string()],
            known_symptoms: default_known_symptoms(),
        };
        let dataset = source.load();
        assert!(dataset.is_empty());
        assert!(dataset.catalog().is_empty());
    }
}
