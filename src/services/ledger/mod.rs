//! Seat Booking Ledger.
//!
//! Owns seat availability per showing and the booking lifecycle:
//!
//! 1.  **reserve**: atomically flips the requested seats from free to booked
//!     and records a `Pending` booking. Either every seat is taken or none is.
//! 2.  **complete_payment**: moves a booking `Pending -> Completed` and then
//!     issues a credential. Issuance is a side effect after the commit; its
//!     failure never undoes the payment.
//! 3.  **validate**: a credential is valid while a `Completed` booking with the
//!     same identifier exists. Validation does not consume the ticket.
//!
//! Seats are held from the moment of reservation, paid or not.

mod payment;
mod reserve;
mod tickets;

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    config::BookingConfig,
    database::Database,
    error::{Error, Result},
    models::{Booking, SeatChart, SeatGrid, SeatLabel},
    services::credentials::CredentialIssuer,
};

use crate::models::booking::BookingRow;

#[derive(Clone)]
pub struct Ledger {
    db: Database,
    config: BookingConfig,
    issuer: Arc<dyn CredentialIssuer>,
}

impl Ledger {
    pub fn new(db: Database, config: BookingConfig, issuer: Arc<dyn CredentialIssuer>) -> Self {
        Self { db, config, issuer }
    }

    /// Seat layout of the showing as stored at seeding time.
    pub async fn grid(&self, showing_id: i64) -> Result<SeatGrid> {
        SeatGrid::for_showing(&self.db.pool, showing_id).await
    }

    pub fn unit_price(&self) -> i64 {
        self.config.unit_price
    }

    /// Labels of every free seat of the showing.
    pub async fn available_seats(&self, showing_id: i64) -> Result<BTreeSet<SeatLabel>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM showings WHERE id = ?)")
            .bind(showing_id)
            .fetch_one(&self.db.pool)
            .await?;
        if !exists {
            return Err(Error::ShowingNotFound(showing_id));
        }

        let labels: Vec<String> = sqlx::query_scalar(
            "SELECT seat_label FROM seats WHERE showing_id = ? AND is_booked = 0",
        )
        .bind(showing_id)
        .fetch_all(&self.db.pool)
        .await?;

        labels
            .into_iter()
            .map(|label| label.parse())
            .collect()
    }

    pub async fn seat_chart(&self, showing_id: i64) -> Result<SeatChart> {
        let grid = self.grid(showing_id).await?;
        let available = self.available_seats(showing_id).await?;
        Ok(SeatChart::new(grid, available))
    }

    pub async fn booking(&self, booking_id: &str) -> Result<Booking> {
        let row = sqlx::query_as::<_, BookingRow>(
            "SELECT booking_id, username, showing_id, seats, total_price,
                    type_payment, payment_status, created_at, paid_at
             FROM bookings WHERE booking_id = ?",
        )
        .bind(booking_id.trim())
        .fetch_optional(&self.db.pool)
        .await?
        .ok_or_else(|| Error::BookingNotFound(booking_id.to_string()))?;

        Ok(Booking::try_from(row)?)
    }

    pub async fn bookings_for_user(&self, username: &str) -> Result<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT booking_id, username, showing_id, seats, total_price,
                    type_payment, payment_status, created_at, paid_at
             FROM bookings WHERE username = ?
             ORDER BY id",
        )
        .bind(username)
        .fetch_all(&self.db.pool)
        .await?;

        rows.into_iter()
            .map(|row| Booking::try_from(row).map_err(Error::from))
            .collect()
    }
}
