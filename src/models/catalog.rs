use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::SeatGrid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub city: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Cinema {
    pub id: i64,
    pub name: String,
    pub location_id: i64,
}

/// A movie screened in one studio at a fixed date and time, joined with
/// where it plays.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShowingView {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub show_date: NaiveDate,
    pub show_time: NaiveTime,
    pub studio: String,
    pub cinema: String,
    pub city: String,
}

/// Everything a client needs before picking seats.
#[derive(Debug, Clone, Serialize)]
pub struct ShowingDetails {
    pub showing: ShowingView,
    pub grid: SeatGrid,
    pub unit_price: i64,
}
