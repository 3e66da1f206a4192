use thiserror::Error;

/// Terminal failures of a symptom query.
///
/// The `Display` text is shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Please enter at least one symptom")]
    EmptyInput,

    #[error("Symptom description is too long (max {max} characters)")]
    InputTooLong { max: usize },

    #[error("Symptom description is too short (min {min} characters)")]
    InputTooShort { min: usize },

    #[error("Symptoms may only contain letters, digits, spaces, commas and hyphens")]
    InvalidCharacters,

    #[error("No known symptoms matched: {}", .0.join(", "))]
    NoMatchingColumns(Vec<String>),
}

/// Non-fatal problems attached to a successful match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchWarning {
    #[error("Search history could not be saved: {0}")]
    PersistenceWarning(String),

    #[error("Doctor recommendations unavailable: {0}")]
    ProviderLookup(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Username must be 3-32 characters of letters, digits or underscores")]
    InvalidUsername,

    #[error("Email address is not valid")]
    InvalidEmail,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Please log in first")]
    NotLoggedIn,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("Doctor not found: {0}")]
    DoctorNotFound(i32),

    #[error("Doctor {0} is not accepting appointments")]
    DoctorUnavailable(String),

    #[error("Appointment time must be in the future")]
    InPast,

    #[error("Reason is too long (max {max} characters)")]
    ReasonTooLong { max: usize },

    #[error("That time slot is already booked")]
    SlotTaken,

    #[error("Appointment not found: {0}")]
    NotFound(uuid::Uuid),
}
