use symcheck_core::{Alternative, Appointment, Doctor, HistoryEntry, LoginSession, User};
use symcheck_entities::{appointments, doctors, search_history, sessions, users};

pub fn user_from_model(m: users::Model) -> User {
    User {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        salt: m.salt,
        created_at: m.created_at,
    }
}

pub const fn session_from_model(m: &sessions::Model) -> LoginSession {
    LoginSession {
        id: m.id,
        user_id: m.user_id,
        created_at: m.created_at,
        expires_at: m.expires_at,
    }
}

pub fn history_from_model(m: search_history::Model) -> anyhow::Result<HistoryEntry> {
    let alternatives: Vec<Alternative> = serde_json::from_str(&m.alternatives)
        .map_err(|e| anyhow::anyhow!("invalid alternatives for history {}: {e}", m.id))?;

    Ok(HistoryEntry {
        id: m.id,
        user_id: m.user_id,
        query: m.query,
        top_prediction: m.top_prediction,
        confidence: m.confidence,
        alternatives,
        created_at: m.created_at,
    })
}

pub fn doctor_from_model(m: doctors::Model) -> Doctor {
    Doctor {
        id: m.id,
        name: m.name,
        specialty: m.specialty,
        available: m.available,
        contact: m.contact,
    }
}

pub fn appointment_from_model(m: appointments::Model) -> Appointment {
    Appointment {
        id: m.id,
        user_id: m.user_id,
        doctor_id: m.doctor_id,
        scheduled_for: m.scheduled_for,
        reason: m.reason,
        created_at: m.created_at,
    }
}
