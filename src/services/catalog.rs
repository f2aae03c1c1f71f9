//! Read-only catalog of cities, cinemas and showings, plus the one-off
//! seeding of the reference catalog.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{QueryBuilder, Sqlite};
use tracing::{debug, info};

use crate::{
    config::BookingConfig,
    database::Database,
    error::{Error, Result},
    models::{Cinema, Location, SeatGrid, SeatLabel, ShowingDetails, ShowingView},
};

// Bound parameters per seat insert statement
const SEAT_INSERT_CHUNK: usize = 500;

const SHOWING_VIEW_SELECT: &str = r#"
    SELECT m.id, m.title, m.genre, m.show_date, m.show_time,
           s.name AS studio, c.name AS cinema, l.city
    FROM showings m
    JOIN studios s ON m.studio_id = s.id
    JOIN cinemas c ON s.cinema_id = c.id
    JOIN locations l ON c.location_id = l.id
"#;

#[derive(Debug, Clone)]
pub struct MovieSeed {
    pub title: String,
    pub genre: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
}

/// Catalog layout: every city gets every cinema, every cinema gets
/// `studios_per_cinema` studios, every studio screens every movie.
#[derive(Debug, Clone)]
pub struct CatalogSeed {
    pub cities: Vec<String>,
    pub cinemas: Vec<String>,
    pub studios_per_cinema: u32,
    pub movies: Vec<MovieSeed>,
}

impl MovieSeed {
    fn at(title: &str, genre: &str, date: (i32, u32, u32), hour: u32) -> Option<Self> {
        Some(MovieSeed {
            title: title.to_string(),
            genre: genre.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)?,
            time: NaiveTime::from_hms_opt(hour, 0, 0)?,
        })
    }
}

impl Default for CatalogSeed {
    fn default() -> Self {
        let movies = [
            ("The Great Adventure", "Action", (2024, 12, 20), 18),
            ("Romantic Getaway", "Romance", (2024, 12, 21), 19),
            ("Mystery of the Night", "Mystery", (2024, 12, 22), 20),
            ("The Last Stand", "Drama", (2024, 12, 23), 21),
            ("Comedy Hour", "Comedy", (2024, 12, 24), 17),
            ("Horror Nights", "Horror", (2024, 12, 25), 22),
            ("Sci-Fi Chronicles", "Sci-Fi", (2024, 12, 26), 16),
        ]
        .into_iter()
        .filter_map(|(title, genre, date, hour)| MovieSeed::at(title, genre, date, hour))
        .collect();

        CatalogSeed {
            cities: ["Jakarta", "Bandung", "Surabaya", "Yogyakarta", "Medan", "Makassar", "Denpasar"]
                .map(String::from)
                .to_vec(),
            cinemas: ["CGV", "XXI", "Cinepolis"].map(String::from).to_vec(),
            studios_per_cinema: 3,
            movies,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub locations: usize,
    pub cinemas: usize,
    pub studios: usize,
    pub showings: usize,
    pub seats: usize,
}

#[derive(Clone)]
pub struct CatalogStore {
    db: Database,
    config: BookingConfig,
}

impl CatalogStore {
    pub fn new(db: Database, config: BookingConfig) -> Self {
        Self { db, config }
    }

    /// Layout given to studios seeded from now on. Existing studios keep
    /// the layout stored with them.
    pub fn grid(&self) -> SeatGrid {
        self.config.grid
    }

    pub fn unit_price(&self) -> i64 {
        self.config.unit_price
    }

    /// Installs `seed` unless the catalog already has locations.
    /// Returns `None` when nothing was inserted.
    pub async fn seed_catalog(&self, seed: &CatalogSeed) -> Result<Option<SeedSummary>> {
        let mut tx = self.db.pool.begin().await?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM locations")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            debug!(
                "Catalog already seeded ({} locations), skipping; configured grid {}x{} applies to new studios only",
                existing,
                self.config.grid.rows(),
                self.config.grid.columns()
            );
            return Ok(None);
        }

        let grid = self.config.grid;
        let labels: Vec<SeatLabel> = grid.labels().collect();
        let mut summary = SeedSummary::default();

        for city in &seed.cities {
            let location_id = sqlx::query("INSERT INTO locations (city) VALUES (?)")
                .bind(city)
                .execute(&mut *tx)
                .await?
                .last_insert_rowid();
            summary.locations += 1;

            for cinema in &seed.cinemas {
                let cinema_id = sqlx::query("INSERT INTO cinemas (name, location_id) VALUES (?, ?)")
                    .bind(cinema)
                    .bind(location_id)
                    .execute(&mut *tx)
                    .await?
                    .last_insert_rowid();
                summary.cinemas += 1;

                for studio_num in 1..=seed.studios_per_cinema {
                    let studio_id = sqlx::query(
                        "INSERT INTO studios (name, cinema_id, grid_rows, grid_columns)
                         VALUES (?, ?, ?, ?)",
                    )
                    .bind(format!("Studio {studio_num}"))
                    .bind(cinema_id)
                    .bind(i64::from(grid.rows()))
                    .bind(i64::from(grid.columns()))
                    .execute(&mut *tx)
                    .await?
                    .last_insert_rowid();
                    summary.studios += 1;

                    for movie in &seed.movies {
                        let showing_id = sqlx::query(
                            "INSERT INTO showings (title, genre, show_date, show_time, studio_id)
                             VALUES (?, ?, ?, ?, ?)",
                        )
                        .bind(&movie.title)
                        .bind(&movie.genre)
                        .bind(movie.date)
                        .bind(movie.time)
                        .bind(studio_id)
                        .execute(&mut *tx)
                        .await?
                        .last_insert_rowid();
                        summary.showings += 1;

                        for chunk in labels.chunks(SEAT_INSERT_CHUNK) {
                            let mut qb: QueryBuilder<Sqlite> =
                                QueryBuilder::new("INSERT INTO seats (showing_id, seat_label) ");
                            qb.push_values(chunk, |mut row, label| {
                                row.push_bind(showing_id).push_bind(label.to_string());
                            });
                            qb.build().execute(&mut *tx).await?;
                        }
                        summary.seats += labels.len();
                    }
                }
            }
        }

        tx.commit().await?;
        info!(
            "Catalog seeded: {} cities, {} cinemas, {} studios, {} showings, {} seats",
            summary.locations, summary.cinemas, summary.studios, summary.showings, summary.seats
        );
        Ok(Some(summary))
    }

    /// Picks the city to browse. Auto-detection reports the configured
    /// default city.
    pub fn resolve_city(&self, auto_detect: bool, city: Option<&str>) -> Result<String> {
        if auto_detect {
            return Ok(self.config.default_city.clone());
        }
        match city.map(str::trim) {
            Some(city) if !city.is_empty() => Ok(city.to_string()),
            _ => Err(Error::CityRequired),
        }
    }

    pub async fn list_cities(&self) -> Result<Vec<Location>> {
        let cities = sqlx::query_as::<_, Location>("SELECT id, city FROM locations ORDER BY id")
            .fetch_all(&self.db.pool)
            .await?;
        Ok(cities)
    }

    pub async fn cinemas_by_city(&self, city: &str) -> Result<Vec<Cinema>> {
        let cinemas = sqlx::query_as::<_, Cinema>(
            "SELECT c.id, c.name, c.location_id
             FROM cinemas c
             JOIN locations l ON c.location_id = l.id
             WHERE l.city = ?
             ORDER BY c.id",
        )
        .bind(city)
        .fetch_all(&self.db.pool)
        .await?;
        Ok(cinemas)
    }

    pub async fn showings_by_cinema(&self, cinema_id: i64) -> Result<Vec<ShowingView>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cinemas WHERE id = ?)")
            .bind(cinema_id)
            .fetch_one(&self.db.pool)
            .await?;
        if !exists {
            return Err(Error::CinemaNotFound(cinema_id));
        }

        let sql = format!("{SHOWING_VIEW_SELECT} WHERE c.id = ? ORDER BY m.id");
        let showings = sqlx::query_as::<_, ShowingView>(&sql)
            .bind(cinema_id)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(showings)
    }

    pub async fn showings_by_city(&self, city: &str) -> Result<Vec<ShowingView>> {
        let sql = format!("{SHOWING_VIEW_SELECT} WHERE l.city = ? ORDER BY m.id");
        let showings = sqlx::query_as::<_, ShowingView>(&sql)
            .bind(city)
            .fetch_all(&self.db.pool)
            .await?;
        Ok(showings)
    }

    pub async fn showing(&self, showing_id: i64) -> Result<ShowingDetails> {
        let sql = format!("{SHOWING_VIEW_SELECT} WHERE m.id = ?");
        let showing = sqlx::query_as::<_, ShowingView>(&sql)
            .bind(showing_id)
            .fetch_optional(&self.db.pool)
            .await?
            .ok_or(Error::ShowingNotFound(showing_id))?;
        let grid = SeatGrid::for_showing(&self.db.pool, showing_id).await?;

        Ok(ShowingDetails {
            showing,
            grid,
            unit_price: self.config.unit_price,
        })
    }
}
