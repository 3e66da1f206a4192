#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::missing_errors_doc)]

mod schema;

pub use schema::{Config, DatabaseConfig, DatasetConfig, HistoryConfig, SessionConfig};

impl Config {
    /// Dataset source described by the `dataset` section.
    #[must_use]
    pub fn dataset_source(&self) -> symcheck_core::DatasetSource {
        symcheck_core::DatasetSource {
            dir: self.dataset.dir.clone(),
            candidates: self.dataset.candidates.clone(),
            known_symptoms: self.dataset.known_symptoms.clone(),
        }
    }
}
