use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use symcheck_core::Doctor;
use symcheck_entities::doctors;
use tracing::info;

/// Provider registry written into an empty `doctors` table.
#[must_use]
pub fn default_doctors() -> Vec<Doctor> {
    [
        ("Dr. Anita Sharma", "General Physician", true),
        ("Dr. Rahul Mehta", "General Physician", true),
        ("Dr. Kavya Iyer", "General Physician", false),
        ("Dr. Vikram Singh", "Infectious Disease Specialist", true),
        ("Dr. Neha Kapoor", "Neurologist", true),
        ("Dr. Arjun Das", "Pulmonologist", true),
        ("Dr. Meera Pillai", "Allergist", true),
        ("Dr. Sanjay Rao", "Gastroenterologist", false),
        ("Dr. Farah Khan", "Orthopedist", true),
        ("Dr. Rohan Verma", "Dermatologist", true),
    ]
    .into_iter()
    .zip(1..)
    .map(|((name, specialty, available), id)| Doctor {
        id,
        name: name.to_string(),
        specialty: specialty.to_string(),
        available,
        contact: format!("+91-80-5550-{:04}", 1000 + id),
    })
    .collect()
}

pub async fn seed_doctors(db: &DatabaseConnection) -> anyhow::Result<()> {
    if doctors::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let seed = default_doctors();
    let count = seed.len();
    doctors::Entity::insert_many(seed.into_iter().map(|d| doctors::ActiveModel {
        id: Set(d.id),
        name: Set(d.name),
        specialty: Set(d.specialty),
        available: Set(d.available),
        contact: Set(d.contact),
    }))
    .exec(db)
    .await?;

    info!("Seeded {count} doctors");
    Ok(())
}
