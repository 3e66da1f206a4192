use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{
    Appointment, Doctor, HistoryEntry, HistoryPage, LoginSession, NewHistoryEntry, User,
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
}

#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn insert(&self, session: &LoginSession) -> anyhow::Result<()>;

    async fn find(&self, id: &Uuid) -> anyhow::Result<Option<LoginSession>>;

    async fn delete(&self, id: &Uuid) -> anyhow::Result<()>;

    /// Remove every session expired at `now`, returning how many were removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64>;
}

/// Append-only search history, scoped by user.
#[async_trait]
pub trait HistoryRepo: Send + Sync {
    async fn append(&self, entry: &NewHistoryEntry) -> anyhow::Result<HistoryEntry>;

    /// Newest-first page of a user's history. `page` is 1-based.
    async fn list(&self, user_id: &Uuid, page: u64, page_size: u64)
    -> anyhow::Result<HistoryPage>;

    /// Delete one record if it belongs to the user.
    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> anyhow::Result<bool>;

    async fn clear(&self, user_id: &Uuid) -> anyhow::Result<u64>;
}

#[async_trait]
pub trait DoctorRepo: Send + Sync {
    async fn list(&self, specialty: Option<&str>) -> anyhow::Result<Vec<Doctor>>;

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Doctor>>;

    /// Available doctors of a specialty (case-insensitive), ordered by id.
    async fn available_by_specialty(
        &self,
        specialty: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<Doctor>>;
}

#[async_trait]
pub trait AppointmentRepo: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()>;

    /// A user's appointments ordered by `scheduled_for`.
    async fn list_for_user(&self, user_id: &Uuid) -> anyhow::Result<Vec<Appointment>>;

    async fn is_slot_taken(&self, doctor_id: i32, at: DateTime<Utc>) -> anyhow::Result<bool>;

    /// Delete one appointment if it belongs to the user.
    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> anyhow::Result<bool>;
}
