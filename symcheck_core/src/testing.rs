//! In-memory repositories for unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::repository::{AppointmentRepo, DoctorRepo, HistoryRepo, SessionRepo, UserRepo};
use crate::types::{
    Appointment, Doctor, HistoryEntry, HistoryPage, LoginSession, NewHistoryEntry, User,
};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
pub struct MemoryUsers(Mutex<Vec<User>>);

#[async_trait]
impl UserRepo for MemoryUsers {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        lock(&self.0).push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<User>> {
        Ok(lock(&self.0).iter().find(|u| u.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(lock(&self.0)
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[derive(Default)]
pub struct MemorySessions(Mutex<Vec<LoginSession>>);

#[async_trait]
impl SessionRepo for MemorySessions {
    async fn insert(&self, session: &LoginSession) -> anyhow::Result<()> {
        lock(&self.0).push(session.clone());
        Ok(())
    }

    async fn find(&self, id: &Uuid) -> anyhow::Result<Option<LoginSession>> {
        Ok(lock(&self.0).iter().find(|s| s.id == *id).cloned())
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<()> {
        lock(&self.0).retain(|s| s.id != *id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut sessions = lock(&self.0);
        let before = sessions.len();
        sessions.retain(|s| !s.is_expired(now));
        Ok((before - sessions.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryHistory(Mutex<Vec<HistoryEntry>>);

impl MemoryHistory {
    pub fn is_empty(&self) -> bool {
        lock(&self.0).is_empty()
    }
}

#[async_trait]
impl HistoryRepo for MemoryHistory {
    async fn append(&self, entry: &NewHistoryEntry) -> anyhow::Result<HistoryEntry> {
        let saved = HistoryEntry {
            id: Uuid::now_v7(),
            user_id: entry.user_id,
            query: entry.query.clone(),
            top_prediction: entry.top_prediction.clone(),
            confidence: entry.confidence,
            alternatives: entry.alternatives.clone(),
            created_at: Utc::now(),
        };
        lock(&self.0).push(saved.clone());
        Ok(saved)
    }

    async fn list(
        &self,
        user_id: &Uuid,
        page: u64,
        page_size: u64,
    ) -> anyhow::Result<HistoryPage> {
        let mut items: Vec<HistoryEntry> = lock(&self.0)
            .iter()
            .filter(|h| h.user_id == *user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total_items = items.len() as u64;
        let page = page.max(1);
        let skip = (page - 1)
            .checked_mul(page_size)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(skip)
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .collect();
        Ok(HistoryPage {
            items,
            page,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(page_size.max(1)),
        })
    }

    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> anyhow::Result<bool> {
        let mut items = lock(&self.0);
        let before = items.len();
        items.retain(|h| !(h.id == *id && h.user_id == *user_id));
        Ok(items.len() != before)
    }

    async fn clear(&self, user_id: &Uuid) -> anyhow::Result<u64> {
        let mut items = lock(&self.0);
        let before = items.len();
        items.retain(|h| h.user_id != *user_id);
        Ok((before - items.len()) as u64)
    }
}

/// History store whose writes always fail.
pub struct FailingHistory;

#[async_trait]
impl HistoryRepo for FailingHistory {
    async fn append(&self, _entry: &NewHistoryEntry) -> anyhow::Result<HistoryEntry> {
        anyhow::bail!("UNIQUE constraint failed: search_history.id")
    }

    async fn list(&self, _: &Uuid, _: u64, _: u64) -> anyhow::Result<HistoryPage> {
        anyhow::bail!("history unavailable")
    }

    async fn delete(&self, _: &Uuid, _: &Uuid) -> anyhow::Result<bool> {
        anyhow::bail!("history unavailable")
    }

    async fn clear(&self, _: &Uuid) -> anyhow::Result<u64> {
        anyhow::bail!("history unavailable")
    }
}

pub struct MemoryDoctors(Vec<Doctor>);

impl MemoryDoctors {
    /// Three general physicians, one available pulmonologist and unavailable
    /// neurology and infectious disease specialists.
    pub fn sample() -> Self {
        let doctor = |id, name: &str, specialty: &str, available| Doctor {
            id,
            name: name.to_string(),
            specialty: specialty.to_string(),
            available,
            contact: format!("doctor{id}@clinic.test"),
        };
        Self(vec![
            doctor(1, "Dr. Asha Rao", "General Physician", true),
            doctor(2, "Dr. Ben Carter", "General Physician", true),
            doctor(3, "Dr. Chloe Diaz", "Neurologist", false),
            doctor(4, "Dr. Omar Haddad", "Pulmonologist", true),
            doctor(5, "Dr. Priya Nair", "Infectious Disease Specialist", false),
            doctor(6, "Dr. Leo Martin", "General Physician", true),
        ])
    }
}

#[async_trait]
impl DoctorRepo for MemoryDoctors {
    async fn list(&self, specialty: Option<&str>) -> anyhow::Result<Vec<Doctor>> {
        Ok(self
            .0
            .iter()
            .filter(|d| specialty.is_none_or(|s| d.specialty.eq_ignore_ascii_case(s)))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Doctor>> {
        Ok(self.0.iter().find(|d| d.id == id).cloned())
    }

    async fn available_by_specialty(
        &self,
        specialty: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<Doctor>> {
        Ok(self
            .0
            .iter()
            .filter(|d| d.available && d.specialty.eq_ignore_ascii_case(specialty))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoryAppointments(Mutex<Vec<Appointment>>);

#[async_trait]
impl AppointmentRepo for MemoryAppointments {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        lock(&self.0).push(appointment.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &Uuid) -> anyhow::Result<Vec<Appointment>> {
        let mut items: Vec<Appointment> = lock(&self.0)
            .iter()
            .filter(|a| a.user_id == *user_id)
            .cloned()
            .collect();
        items.sort_by_key(|a| a.scheduled_for);
        Ok(items)
    }

    async fn is_slot_taken(&self, doctor_id: i32, at: DateTime<Utc>) -> anyhow::Result<bool> {
        Ok(lock(&self.0)
            .iter()
            .any(|a| a.doctor_id == doctor_id && a.scheduled_for == at))
    }

    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> anyhow::Result<bool> {
        let mut items = lock(&self.0);
        let before = items.len();
        items.retain(|a| !(a.id == *id && a.user_id == *user_id));
        Ok(items.len() != before)
    }
}
