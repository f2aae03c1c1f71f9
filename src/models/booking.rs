use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use super::SeatLabel;
use crate::error::Error;

/// Public booking identifier, distinct from the internal row key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn generate() -> Self {
        BookingId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookingId {
    fn from(value: &str) -> Self {
        BookingId(value.trim().to_string())
    }
}

impl From<String> for BookingId {
    fn from(value: String) -> Self {
        BookingId::from(value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Cash,
    Card,
    #[serde(rename = "E-Wallet")]
    EWallet,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Cash => "Cash",
            PaymentType::Card => "Card",
            PaymentType::EWallet => "E-Wallet",
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentType::Cash),
            "Card" => Ok(PaymentType::Card),
            "E-Wallet" => Ok(PaymentType::EWallet),
            other => Err(Error::InvalidPaymentType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Completed" => Ok(PaymentStatus::Completed),
            other => Err(format!("unknown payment status {other:?}")),
        }
    }
}

// Raw row of the bookings table
#[derive(Debug, FromRow)]
pub(crate) struct BookingRow {
    pub booking_id: BookingId,
    pub username: String,
    pub showing_id: i64,
    pub seats: String,
    pub total_price: i64,
    pub type_payment: Option<String>,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub booking_id: BookingId,
    pub username: String,
    pub showing_id: i64,
    pub seats: Vec<SeatLabel>,
    pub total_price: i64,
    pub payment_type: Option<PaymentType>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

pub(crate) fn decode_err(column: &str, reason: impl ToString) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: reason.to_string().into(),
    }
}

pub(crate) fn join_seats<'a>(seats: impl IntoIterator<Item = &'a SeatLabel>) -> String {
    seats
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn split_seats(seats: &str) -> Result<Vec<SeatLabel>, sqlx::Error> {
    seats
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|e: Error| decode_err("seats", e)))
        .collect()
}

impl TryFrom<BookingRow> for Booking {
    type Error = sqlx::Error;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let payment_type = row
            .type_payment
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e: Error| decode_err("type_payment", e))?;
        let payment_status = row
            .payment_status
            .parse()
            .map_err(|e: String| decode_err("payment_status", e))?;

        Ok(Booking {
            booking_id: row.booking_id,
            username: row.username,
            showing_id: row.showing_id,
            seats: split_seats(&row.seats)?,
            total_price: row.total_price,
            payment_type,
            payment_status,
            created_at: row.created_at,
            paid_at: row.paid_at,
        })
    }
}

/// Result of a successful seat reservation.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub booking_id: BookingId,
    pub showing_id: i64,
    pub seats: Vec<SeatLabel>,
    pub total_price: i64,
}

/// Opaque reference to an issued ticket credential (a file path for the
/// bundled issuer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialRef(pub String);

impl fmt::Display for CredentialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload carried by a ticket: the booking identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub payload: String,
}

impl Credential {
    pub fn new(payload: impl Into<String>) -> Self {
        Credential {
            payload: payload.into(),
        }
    }
}

impl From<&BookingId> for Credential {
    fn from(id: &BookingId) -> Self {
        Credential::new(id.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub booking_id: BookingId,
    pub payment_type: PaymentType,
    pub credential: CredentialRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Validity {
    Valid,
    Invalid,
}

// Row for the printed ticket; seats stay comma-joined as stored
#[derive(Debug, FromRow)]
pub(crate) struct TicketRow {
    pub booking_id: BookingId,
    pub username: String,
    pub title: String,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub studio: String,
    pub cinema: String,
    pub city: String,
    pub seats: String,
    pub total_price: i64,
    pub type_payment: Option<String>,
    pub payment_status: String,
}

/// Everything printed on a ticket.
#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    pub booking_id: BookingId,
    pub username: String,
    pub movie: String,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub studio: String,
    pub cinema: String,
    pub city: String,
    pub seats: Vec<SeatLabel>,
    pub total_price: i64,
    pub payment_type: Option<PaymentType>,
    pub payment_status: PaymentStatus,
}

impl TryFrom<TicketRow> for TicketView {
    type Error = sqlx::Error;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        let payment_type = row
            .type_payment
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e: Error| decode_err("type_payment", e))?;
        let payment_status = row
            .payment_status
            .parse()
            .map_err(|e: String| decode_err("payment_status", e))?;

        Ok(TicketView {
            booking_id: row.booking_id,
            username: row.username,
            movie: row.title,
            show_date: row.show_date,
            show_time: row.show_time,
            studio: row.studio,
            cinema: row.cinema,
            city: row.city,
            seats: split_seats(&row.seats)?,
            total_price: row.total_price,
            payment_type,
            payment_status,
        })
    }
}

impl fmt::Display for TicketView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "======= TICKET =======")?;
        writeln!(f, "Booking ID: {}", self.booking_id)?;
        writeln!(f, "Username: {}", self.username)?;
        writeln!(f, "Movie: {}", self.movie)?;
        writeln!(
            f,
            "Date: {} {}",
            self.show_date.format("%Y-%m-%d"),
            self.show_time.format("%H:%M")
        )?;
        writeln!(f, "Studio: {}", self.studio)?;
        writeln!(f, "Cinema: {}", self.cinema)?;
        writeln!(f, "City: {}", self.city)?;
        writeln!(f, "Seats: {}", join_seats(&self.seats))?;
        writeln!(f, "Total: {}", self.total_price)?;
        if let Some(payment_type) = self.payment_type {
            writeln!(f, "Payment Type: {payment_type}")?;
        }
        writeln!(f, "Payment Status: {}", self.payment_status)?;
        write!(f, "======================")
    }
}
