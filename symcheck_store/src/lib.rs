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
    clippy::missing_errors_doc
)]

mod accounts;
mod convert;
mod history;
mod providers;
mod seed;
mod store;

pub use accounts::{DatabaseSessionRepository, DatabaseUserRepository};
pub use history::DatabaseHistoryRepository;
pub use providers::{DatabaseAppointmentRepository, DatabaseDoctorRepository};
pub use seed::default_doctors;
pub use store::Store;
