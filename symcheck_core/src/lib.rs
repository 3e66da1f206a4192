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
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]

pub mod account;
pub mod booking;
pub mod dataset;
pub mod error;
pub mod lookup;
pub mod matcher;
pub mod query;
pub mod repository;
pub mod service;
pub mod tables;
mod types;

#[cfg(test)]
mod testing;

pub use account::AccountService;
pub use booking::BookingService;
pub use dataset::{
    CaseRecord, CatalogEntry, Dataset, DatasetSource, LABEL_ALIASES, SymptomCatalog, parse_boolish,
};
pub use error::{AccountError, BookingError, MatchError, MatchWarning};
pub use lookup::{Lookup, LookupRule, LookupTable};
pub use matcher::{
    ColumnResolution, Diagnosis, MatcherContext, MatcherSettings, Prediction, SymptomMatcher,
};
pub use query::QueryLimits;
pub use repository::{AppointmentRepo, DoctorRepo, HistoryRepo, SessionRepo, UserRepo};
pub use service::{MatchOutcome, SymptomChecker};
pub use types::{
    Alternative, Appointment, Doctor, HistoryEntry, HistoryPage, LoginSession, NewHistoryEntry,
    User,
};
