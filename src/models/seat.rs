use serde::{Deserialize, Serialize};
use sqlx::{Pool, Sqlite};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::models::booking::decode_err;

const MAX_ROWS: u8 = 26;

/// Seat layout of a studio: `rows` lettered from `A`, `columns` numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDimensions")]
pub struct SeatGrid {
    rows: u8,
    columns: u16,
}

#[derive(Deserialize)]
struct GridDimensions {
    rows: u8,
    columns: u16,
}

impl TryFrom<GridDimensions> for SeatGrid {
    type Error = String;

    fn try_from(dims: GridDimensions) -> Result<Self, Self::Error> {
        SeatGrid::new(dims.rows, dims.columns)
    }
}

impl Default for SeatGrid {
    fn default() -> Self {
        Self { rows: 6, columns: 10 }
    }
}

impl SeatGrid {
    pub fn new(rows: u8, columns: u16) -> Result<Self, String> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(format!("rows must be within 1..={MAX_ROWS}, got {rows}"));
        }
        if columns == 0 {
            return Err("columns must be > 0".to_string());
        }
        Ok(Self { rows, columns })
    }

    /// Layout the showing's studio was seeded with. Seat rows in storage
    /// follow this grid, whatever the current configuration says.
    pub(crate) async fn for_showing(pool: &Pool<Sqlite>, showing_id: i64) -> Result<Self, Error> {
        let (rows, columns): (i64, i64) = sqlx::query_as(
            "SELECT s.grid_rows, s.grid_columns
             FROM showings m
             JOIN studios s ON m.studio_id = s.id
             WHERE m.id = ?",
        )
        .bind(showing_id)
        .fetch_optional(pool)
        .await?
        .ok_or(Error::ShowingNotFound(showing_id))?;

        let rows = u8::try_from(rows).map_err(|e| decode_err("grid_rows", e))?;
        let columns = u16::try_from(columns).map_err(|e| decode_err("grid_columns", e))?;
        Ok(SeatGrid::new(rows, columns).map_err(|e| decode_err("grid_rows", e))?)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn capacity(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    pub fn row_letters(&self) -> impl Iterator<Item = char> {
        (0..self.rows).map(|i| (b'A' + i) as char)
    }

    pub fn contains(&self, label: &SeatLabel) -> bool {
        match (label.row as u32).checked_sub('A' as u32) {
            Some(row_index) => {
                row_index < self.rows as u32 && (1..=self.columns).contains(&label.column)
            }
            None => false,
        }
    }

    /// Every seat of the grid in row-major order.
    pub fn labels(&self) -> impl Iterator<Item = SeatLabel> + '_ {
        self.row_letters()
            .flat_map(move |row| (1..=self.columns).map(move |column| SeatLabel { row, column }))
    }

    /// Parses a client selection, collapsing duplicates and rejecting labels
    /// outside the grid.
    pub fn parse_selection<S: AsRef<str>>(&self, seats: &[S]) -> Result<BTreeSet<SeatLabel>, Error> {
        if seats.is_empty() {
            return Err(Error::EmptySeatSelection);
        }
        let mut selection = BTreeSet::new();
        for raw in seats {
            let label: SeatLabel = raw.as_ref().parse()?;
            if !self.contains(&label) {
                return Err(Error::InvalidSeatLabel(raw.as_ref().to_string()));
            }
            selection.insert(label);
        }
        Ok(selection)
    }
}

/// Row letter plus column number, e.g. `A1`. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatLabel {
    row: char,
    column: u16,
}

impl SeatLabel {
    pub fn row(&self) -> char {
        self.row
    }

    pub fn column(&self) -> u16 {
        self.column
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

impl FromStr for SeatLabel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || Error::InvalidSeatLabel(s.to_string());

        let mut chars = trimmed.chars();
        let row = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(invalid)?
            .to_ascii_uppercase();
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let column: u16 = digits.parse().map_err(|_| invalid())?;
        if column == 0 {
            return Err(invalid());
        }
        Ok(SeatLabel { row, column })
    }
}

impl TryFrom<String> for SeatLabel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatLabel> for String {
    fn from(label: SeatLabel) -> Self {
        label.to_string()
    }
}

/// Booked/free map of one showing, rendered the way the box office prints it.
#[derive(Debug, Clone)]
pub struct SeatChart {
    grid: SeatGrid,
    available: BTreeSet<SeatLabel>,
}

impl SeatChart {
    pub fn new(grid: SeatGrid, available: BTreeSet<SeatLabel>) -> Self {
        Self { grid, available }
    }

    pub fn is_available(&self, label: &SeatLabel) -> bool {
        self.available.contains(label)
    }

    pub fn available(&self) -> &BTreeSet<SeatLabel> {
        &self.available
    }
}

impl fmt::Display for SeatChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Seating Chart:")?;
        write!(f, "  ")?;
        for column in 1..=self.grid.columns() {
            write!(f, "{column:>2} ")?;
        }
        writeln!(f)?;
        writeln!(f, "  {}", "---".repeat(self.grid.columns() as usize))?;

        for row in self.grid.row_letters() {
            write!(f, "{row} ")?;
            for column in 1..=self.grid.columns() {
                // Seats missing from storage render as booked.
                let cell = if self.available.contains(&SeatLabel { row, column }) {
                    "[ ]"
                } else {
                    "[X]"
                };
                write!(f, "{cell} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "\n[X] = Booked, [ ] = Available")
    }
}
