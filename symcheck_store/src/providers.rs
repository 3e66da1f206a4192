use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use symcheck_core::{Appointment, AppointmentRepo, Doctor, DoctorRepo};
use symcheck_entities::{appointments, doctors};
use uuid::Uuid;

use crate::convert;

pub struct DatabaseDoctorRepository {
    db: DatabaseConnection,
}

impl DatabaseDoctorRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn all(&self) -> anyhow::Result<Vec<Doctor>> {
        Ok(doctors::Entity::find()
            .order_by_asc(doctors::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(convert::doctor_from_model)
            .collect())
    }
}

// Specialty filters compare case-insensitively, which SQLite's `=` does not,
// so they run over the (small) registry in memory.
#[async_trait]
impl DoctorRepo for DatabaseDoctorRepository {
    async fn list(&self, specialty: Option<&str>) -> anyhow::Result<Vec<Doctor>> {
        let mut doctors = self.all().await?;
        if let Some(specialty) = specialty {
            doctors.retain(|d| d.specialty.eq_ignore_ascii_case(specialty.trim()));
        }
        Ok(doctors)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Doctor>> {
        Ok(doctors::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(convert::doctor_from_model))
    }

    async fn available_by_specialty(
        &self,
        specialty: &str,
        limit: usize,
    ) -> anyhow::Result<Vec<Doctor>> {
        let specialty = specialty.trim();
        Ok(self
            .all()
            .await?
            .into_iter()
            .filter(|d| d.available && d.specialty.eq_ignore_ascii_case(specialty))
            .take(limit)
            .collect())
    }
}

pub struct DatabaseAppointmentRepository {
    db: DatabaseConnection,
}

impl DatabaseAppointmentRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AppointmentRepo for DatabaseAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> anyhow::Result<()> {
        appointments::ActiveModel {
            id: Set(appointment.id),
            user_id: Set(appointment.user_id),
            doctor_id: Set(appointment.doctor_id),
            scheduled_for: Set(appointment.scheduled_for),
            reason: Set(appointment.reason.clone()),
            created_at: Set(appointment.created_at),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &Uuid) -> anyhow::Result<Vec<Appointment>> {
        Ok(appointments::Entity::find()
            .filter(appointments::Column::UserId.eq(*user_id))
            .order_by_asc(appointments::Column::ScheduledFor)
            .all(&self.db)
            .await?
            .into_iter()
            .map(convert::appointment_from_model)
            .collect())
    }

    async fn is_slot_taken(&self, doctor_id: i32, at: DateTime<Utc>) -> anyhow::Result<bool> {
        let taken = appointments::Entity::find()
            .filter(appointments::Column::DoctorId.eq(doctor_id))
            .filter(appointments::Column::ScheduledFor.eq(at))
            .count(&self.db)
            .await?;
        Ok(taken > 0)
    }

    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> anyhow::Result<bool> {
        let result = appointments::Entity::delete_many()
            .filter(appointments::Column::Id.eq(*id))
            .filter(appointments::Column::UserId.eq(*user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
