use crate::models::SeatLabel;

/// Errors reported by the booking services.
///
/// All variants are recoverable: callers get enough detail to correct the
/// input or retry. Only `Database` and `Migration` indicate a storage fault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("seats unavailable for showing {showing_id}: {}", join_labels(.seats))]
    SeatUnavailable {
        showing_id: i64,
        seats: Vec<SeatLabel>,
    },

    #[error("invalid payment type {0:?}, expected one of Cash, Card, E-Wallet")]
    InvalidPaymentType(String),

    #[error("booking {0} not found")]
    BookingNotFound(String),

    /// The payment itself is committed; only the credential side effect failed.
    #[error("payment for booking {booking_id} completed but credential issuance failed: {source}")]
    CredentialIssuanceFailed {
        booking_id: String,
        #[source]
        source: crate::services::credentials::IssuanceError,
    },

    #[error("credential {0:?} does not match a paid booking")]
    InvalidCredential(String),

    #[error("invalid seat label {0:?}")]
    InvalidSeatLabel(String),

    #[error("no seats selected")]
    EmptySeatSelection,

    #[error("showing {0} not found")]
    ShowingNotFound(i64),

    #[error("cinema {0} not found")]
    CinemaNotFound(i64),

    #[error("booking {0} is already paid")]
    PaymentAlreadyCompleted(String),

    #[error("city is required when location detection is disabled")]
    CityRequired,

    #[error("username {0:?} already exists")]
    UsernameTaken(String),

    #[error("invalid sign-up data: {0}")]
    InvalidSignUp(#[from] validator::ValidationErrors),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, Error>;

fn join_labels(seats: &[SeatLabel]) -> String {
    seats
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
