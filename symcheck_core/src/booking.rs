//! Appointment booking against the provider registry.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::BookingError;
use crate::repository::{AppointmentRepo, DoctorRepo};
use crate::types::{Appointment, Doctor};

pub const MAX_REASON_LEN: usize = 500;

pub struct BookingService {
    doctors: Arc<dyn DoctorRepo>,
    appointments: Arc<dyn AppointmentRepo>,
}

impl BookingService {
    #[must_use]
    pub fn new(doctors: Arc<dyn DoctorRepo>, appointments: Arc<dyn AppointmentRepo>) -> Self {
        Self {
            doctors,
            appointments,
        }
    }

    /// Book a doctor for a user.
    ///
    /// # Errors
    /// [`BookingError`] (wrapped in `anyhow`) when the doctor is unknown or
    /// unavailable, the time is not in the future, the reason is too long or
    /// the slot is already taken.
    pub async fn book(
        &self,
        user_id: &Uuid,
        doctor_id: i32,
        scheduled_for: DateTime<Utc>,
        reason: Option<&str>,
    ) -> anyhow::Result<(Appointment, Doctor)> {
        let doctor = self
            .doctors
            .find_by_id(doctor_id)
            .await?
            .ok_or(BookingError::DoctorNotFound(doctor_id))?;
        if !doctor.available {
            return Err(BookingError::DoctorUnavailable(doctor.name).into());
        }

        let now = Utc::now();
        if scheduled_for <= now {
            return Err(BookingError::InPast.into());
        }

        let reason = reason.map(str::trim).filter(|r| !r.is_empty());
        if reason.is_some_and(|r| r.chars().count() > MAX_REASON_LEN) {
            return Err(BookingError::ReasonTooLong {
                max: MAX_REASON_LEN,
            }
            .into());
        }

        if self
            .appointments
            .is_slot_taken(doctor_id, scheduled_for)
            .await?
        {
            return Err(BookingError::SlotTaken.into());
        }

        let appointment = Appointment {
            id: Uuid::now_v7(),
            user_id: *user_id,
            doctor_id,
            scheduled_for,
            reason: reason.map(ToString::to_string),
            created_at: now,
        };
        self.appointments.insert(&appointment).await?;

        info!(
            "Booked {} with {} at {}",
            appointment.id, doctor.name, appointment.scheduled_for
        );
        Ok((appointment, doctor))
    }

    pub async fn list(&self, user_id: &Uuid) -> anyhow::Result<Vec<Appointment>> {
        self.appointments.list_for_user(user_id).await
    }

    /// Cancel one of the user's appointments.
    pub async fn cancel(&self, user_id: &Uuid, appointment_id: &Uuid) -> anyhow::Result<()> {
        if self.appointments.delete(user_id, appointment_id).await? {
            info!("Cancelled appointment {}", appointment_id);
            Ok(())
        } else {
            Err(BookingError::NotFound(*appointment_id).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryAppointments, MemoryDoctors};
    use chrono::Duration;

    fn service() -> BookingService {
        BookingService::new(
            Arc::new(MemoryDoctors::sample()),
            Arc::new(MemoryAppointments::default()),
        )
    }

    fn booking_err(result: anyhow::Result<(Appointment, Doctor)>) -> Option<BookingError> {
        result
            .err()
            .and_then(|e| e.downcast_ref::<BookingError>().cloned())
    }

    fn tomorrow() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[tokio::test]
    async fn books_and_lists() -> anyhow::Result<()> {
        let service = service();
        let user = Uuid::now_v7();
        let (appointment, doctor) = service.book(&user, 1, tomorrow(), Some("  cough ")).await?;

        assert_eq!(doctor.id, 1);
        assert_eq!(appointment.reason.as_deref(), Some("cough"));
        assert_eq!(service.list(&user).await?, vec![appointment]);
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unknown_and_unavailable_doctors() {
        let service = service();
        let user = Uuid::now_v7();

        assert_eq!(
            booking_err(service.book(&user, 99, tomorrow(), None).await),
            Some(BookingError::DoctorNotFound(99))
        );
        assert!(matches!(
            booking_err(service.book(&user, 3, tomorrow(), None).await),
            Some(BookingError::DoctorUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn rejects_past_times() {
        let service = service();
        let past = Utc::now() - Duration::hours(1);
        assert_eq!(
            booking_err(service.book(&Uuid::now_v7(), 1, past, None).await),
            Some(BookingError::InPast)
        );
    }

    #[tokio::test]
    async fn rejects_double_booking() -> anyhow::Result<()> {
        let service = service();
        let at = tomorrow();
        service.book(&Uuid::now_v7(), 1, at, None).await?;

        assert_eq!(
            booking_err(service.book(&Uuid::now_v7(), 1, at, None).await),
            Some(BookingError::SlotTaken)
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejects_long_reason() {
        let service = service();
        let reason = "x".repeat(MAX_REASON_LEN + 1);
        assert_eq!(
            booking_err(service.book(&Uuid::now_v7(), 1, tomorrow(), Some(&reason)).await),
            Some(BookingError::ReasonTooLong { max: MAX_REASON_LEN })
        );
    }

    #[tokio::test]
    async fn cancel_is_scoped_to_owner() -> anyhow::Result<()> {
        let service = service();
        let owner = Uuid::now_v7();
        let (appointment, _) = service.book(&owner, 1, tomorrow(), None).await?;

        let stranger = Uuid::now_v7();
        assert!(service.cancel(&stranger, &appointment.id).await.is_err());
        assert_eq!(service.list(&owner).await?.len(), 1);

        service.cancel(&owner, &appointment.id).await?;
        assert!(service.list(&owner).await?.is_empty());
        Ok(())
    }
}
