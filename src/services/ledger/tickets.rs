use tracing::{debug, info, warn};

use super::Ledger;
use crate::{
    error::{Error, Result},
    models::{booking::TicketRow, Credential, TicketView, Validity},
    services::credentials::CredentialReader,
};

impl Ledger {
    /// Valid iff a `Completed` booking carries the credential's payload.
    /// Repeated scans of the same credential stay valid.
    pub async fn validate(&self, credential: &Credential) -> Result<Validity> {
        let paid: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booking_id = ? AND payment_status = 'Completed'
             )",
        )
        .bind(credential.payload.trim())
        .fetch_one(&self.db.pool)
        .await?;

        let validity = if paid { Validity::Valid } else { Validity::Invalid };
        debug!("Credential {:?} is {:?}", credential.payload, validity);
        Ok(validity)
    }

    /// Reads a credential from `reader` and validates it. Nothing read means
    /// `Invalid`.
    pub async fn admit(&self, reader: &dyn CredentialReader) -> Result<Validity> {
        let credential = match reader.read_credential().await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                info!("No credential presented");
                return Ok(Validity::Invalid);
            }
            Err(e) => {
                warn!("Credential could not be read: {}", e);
                return Ok(Validity::Invalid);
            }
        };
        self.validate(&credential).await
    }

    pub async fn ticket(&self, booking_id: &str) -> Result<TicketView> {
        let row = sqlx::query_as::<_, TicketRow>(
            r#"
            SELECT b.booking_id, b.username, m.title, m.show_date, m.show_time,
                   s.name AS studio, c.name AS cinema, l.city,
                   b.seats, b.total_price, b.type_payment, b.payment_status
            FROM bookings b
            JOIN showings m ON b.showing_id = m.id
            JOIN studios s ON m.studio_id = s.id
            JOIN cinemas c ON s.cinema_id = c.id
            JOIN locations l ON c.location_id = l.id
            WHERE b.booking_id = ?
            "#,
        )
        .bind(booking_id.trim())
        .fetch_optional(&self.db.pool)
        .await?
        .ok_or_else(|| Error::BookingNotFound(booking_id.to_string()))?;

        Ok(TicketView::try_from(row)?)
    }

    /// Ticket for a presented credential, only if it validates.
    pub async fn ticket_for_credential(&self, credential: &Credential) -> Result<TicketView> {
        match self.validate(credential).await? {
            Validity::Valid => self.ticket(&credential.payload).await,
            Validity::Invalid => Err(Error::InvalidCredential(credential.payload.clone())),
        }
    }
}
