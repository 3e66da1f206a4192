use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

use super::init_common_components;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a local `YYYY-MM-DD HH:MM` time into UTC.
fn parse_local_time(value: &str) -> anyhow::Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT)
        .map_err(|e| anyhow::anyhow!("Invalid time '{value}', expected YYYY-MM-DD HH:MM: {e}"))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("'{value}' does not exist in the local time zone"))
}

fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local).format(TIME_FORMAT).to_string()
}

/// Strategy for listing the provider registry.
#[derive(Debug, Clone, Copy)]
pub struct DoctorsStrategy;

impl super::CommandStrategy for DoctorsStrategy {
    /// Optional specialty filter
    type Input = Option<String>;

    async fn execute(&self, specialty: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components().await?;
        let doctors = common.store.doctors().list(specialty.as_deref()).await?;

        if doctors.is_empty() {
            println!("No doctors found");
            return Ok(());
        }

        for d in &doctors {
            let status = if d.available { "available" } else { "unavailable" };
            println!(
                "[{:>2}] {:<20} {:<30} {:<12} {}",
                d.id, d.name, d.specialty, status, d.contact
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BookInput {
    pub doctor_id: i32,
    /// Local time, `YYYY-MM-DD HH:MM`
    pub at: String,
    pub reason: Option<String>,
}

/// Strategy for booking an appointment.
#[derive(Debug, Clone, Copy)]
pub struct BookStrategy;

impl super::CommandStrategy for BookStrategy {
    type Input = BookInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let scheduled_for = parse_local_time(&input.at)?;

        let common = init_common_components().await?;
        let user = common.current_user().await?;
        let booking = common.booking();

        let (appointment, doctor) = booking
            .book(
                &user.id,
                input.doctor_id,
                scheduled_for,
                input.reason.as_deref(),
            )
            .await?;

        println!(
            "✅ Booked {} ({}) on {}",
            doctor.name,
            doctor.specialty,
            format_local(appointment.scheduled_for)
        );
        println!("   Appointment id: {}", appointment.id);
        Ok(())
    }
}

/// Strategy for listing the user's appointments.
#[derive(Debug, Clone, Copy)]
pub struct AppointmentsStrategy;

impl super::CommandStrategy for AppointmentsStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components().await?;
        let user = common.current_user().await?;
        let appointments = common.booking().list(&user.id).await?;

        if appointments.is_empty() {
            println!("No appointments");
            return Ok(());
        }

        let doctors = common.store.doctors();
        for a in &appointments {
            let doctor = doctors
                .find_by_id(a.doctor_id)
                .await?
                .map_or_else(|| format!("doctor #{}", a.doctor_id), |d| d.name);
            println!("{}  {}  {}", format_local(a.scheduled_for), doctor, a.id);
            if let Some(reason) = &a.reason {
                println!("  Reason: {reason}");
            }
        }
        Ok(())
    }
}

/// Strategy for cancelling one of the user's appointments.
#[derive(Debug, Clone, Copy)]
pub struct CancelStrategy;

impl super::CommandStrategy for CancelStrategy {
    type Input = Uuid;

    async fn execute(&self, id: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components().await?;
        let user = common.current_user().await?;

        common.booking().cancel(&user.id, &id).await?;
        println!("🗑️  Cancelled appointment {id}");
        Ok(())
    }
}
