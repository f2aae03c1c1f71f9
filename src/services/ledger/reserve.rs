use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite};
use std::collections::BTreeSet;
use tracing::{info, warn};

use super::Ledger;
use crate::{
    error::{Error, Result},
    models::{booking::join_seats, BookingId, Reservation, SeatLabel},
};

impl Ledger {
    /// Reserves `seats` on `showing_id` for `username`.
    ///
    /// The availability check and the booking of the seats are one
    /// conditional `UPDATE` inside the transaction: only rows still free are
    /// flipped, and anything requested but not flipped is a conflict. On
    /// conflict the transaction rolls back and nothing changes.
    pub async fn reserve<S: AsRef<str>>(
        &self,
        showing_id: i64,
        username: &str,
        seats: &[S],
    ) -> Result<Reservation> {
        // Showings and their layout never change after seeding, so this read
        // stays outside the transaction.
        let requested = self.grid(showing_id).await?.parse_selection(seats)?;

        let mut tx = self.db.pool.begin().await?;

        // Write first so the transaction takes the write lock up front.
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "UPDATE seats SET is_booked = 1 WHERE is_booked = 0 AND showing_id = ",
        );
        qb.push_bind(showing_id);
        qb.push(" AND seat_label IN (");
        let mut labels = qb.separated(", ");
        for label in &requested {
            labels.push_bind(label.to_string());
        }
        labels.push_unseparated(") RETURNING seat_label");

        let flipped: Vec<String> = qb
            .build_query_scalar()
            .fetch_all(&mut *tx)
            .await?;

        if flipped.len() != requested.len() {
            tx.rollback().await?;
            let flipped: BTreeSet<SeatLabel> = flipped
                .iter()
                .map(|label| label.parse())
                .collect::<Result<_>>()?;

            let conflicts: Vec<SeatLabel> = requested.difference(&flipped).copied().collect();
            warn!(
                "Reservation by {} on showing {} rejected, unavailable: {}",
                username,
                showing_id,
                join_seats(&conflicts)
            );
            return Err(Error::SeatUnavailable {
                showing_id,
                seats: conflicts,
            });
        }

        let booking_id = BookingId::generate();
        let total_price = requested.len() as i64 * self.config.unit_price;

        sqlx::query(
            "INSERT INTO bookings (booking_id, username, showing_id, seats, total_price, payment_status, created_at)
             VALUES (?, ?, ?, ?, ?, 'Pending', ?)",
        )
        .bind(&booking_id)
        .bind(username)
        .bind(showing_id)
        .bind(join_seats(&requested))
        .bind(total_price)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Booking {} created for {}: showing {}, seats {}, total {}",
            booking_id,
            username,
            showing_id,
            join_seats(&requested),
            total_price
        );

        Ok(Reservation {
            booking_id,
            showing_id,
            seats: requested.into_iter().collect(),
            total_price,
        })
    }
}
