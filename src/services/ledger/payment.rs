use chrono::Utc;
use tracing::{error, info, warn};

use super::Ledger;
use crate::{
    error::{Error, Result},
    models::{BookingId, PaymentReceipt, PaymentStatus, PaymentType},
};

impl Ledger {
    /// Marks a pending booking as paid and issues its credential.
    ///
    /// A booking that is already `Completed` is rejected with
    /// `PaymentAlreadyCompleted` and keeps its original payment type. If the
    /// credential cannot be issued the payment stays committed and
    /// `CredentialIssuanceFailed` is returned.
    pub async fn complete_payment(&self, booking_id: &str, payment_type: &str) -> Result<PaymentReceipt> {
        let payment_type: PaymentType = payment_type.parse()?;
        let booking_id = BookingId::from(booking_id);

        let updated = sqlx::query(
            "UPDATE bookings
             SET payment_status = 'Completed', type_payment = ?, paid_at = ?
             WHERE booking_id = ? AND payment_status = 'Pending'",
        )
        .bind(payment_type.as_str())
        .bind(Utc::now())
        .bind(&booking_id)
        .execute(&self.db.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            let status: Option<String> =
                sqlx::query_scalar("SELECT payment_status FROM bookings WHERE booking_id = ?")
                    .bind(&booking_id)
                    .fetch_optional(&self.db.pool)
                    .await?;
            return match status.as_deref().map(str::parse::<PaymentStatus>) {
                None => Err(Error::BookingNotFound(booking_id.to_string())),
                Some(Ok(PaymentStatus::Completed)) => {
                    warn!("Booking {} is already paid, rejecting second payment", booking_id);
                    Err(Error::PaymentAlreadyCompleted(booking_id.to_string()))
                }
                // Lost a race with a concurrent payment or the row is corrupt;
                // either way this call did not pay it.
                Some(_) => Err(Error::PaymentAlreadyCompleted(booking_id.to_string())),
            };
        }

        info!("Payment completed for booking {} via {}", booking_id, payment_type);

        match self.issuer.issue(&booking_id).await {
            Ok(credential) => Ok(PaymentReceipt {
                booking_id,
                payment_type,
                credential,
            }),
            Err(source) => {
                error!(
                    "Credential issuance failed for paid booking {}: {}",
                    booking_id, source
                );
                Err(Error::CredentialIssuanceFailed {
                    booking_id: booking_id.to_string(),
                    source,
                })
            }
        }
    }
}
