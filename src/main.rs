use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticket_booking::{config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Invalid configuration")?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    if config.app.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!(
        "Starting ticket booking ({}) on {}",
        config.app.environment, config.database.url
    );

    let state = AppState::new(config)
        .await
        .context("Failed to initialise the booking store")?;
    info!("Database connected and catalog ready");

    let cities = state.catalog.list_cities().await?;
    for city in &cities {
        let showings = state.catalog.showings_by_city(&city.city).await?;
        info!("{}: {} showings", city.city, showings.len());
    }

    let default_city = state.catalog.resolve_city(true, None)?;
    for cinema in state.catalog.cinemas_by_city(&default_city).await? {
        info!("{} / {} (cinema {})", default_city, cinema.name, cinema.id);
        if let Some(first) = state.catalog.showings_by_cinema(cinema.id).await?.first() {
            let details = state.catalog.showing(first.id).await?;
            debug!("First showing: {}", serde_json::to_string(&details)?);
        }
    }

    info!(
        "Seat grid {}x{}, unit price {}",
        state.catalog.grid().rows(),
        state.catalog.grid().columns(),
        state.catalog.unit_price()
    );
    Ok(())
}
