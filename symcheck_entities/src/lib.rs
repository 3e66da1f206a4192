//! Database entities for accounts, search history and appointments.

pub mod appointments;
pub mod doctors;
pub mod search_history;
pub mod sessions;
pub mod users;
