mod config;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use config::AppConfig;
use hoopcast_api::{create_routes, AppState};
use hoopcast_ml::ModelBundle;
use hoopcast_services::{load_game_log, load_team_summaries, PredictionService};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoopcast=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hoopcast prediction service");

    let config = AppConfig::new().context("loading configuration")?;
    info!("Server will bind to {}", config.server_addr());

    // A schema/width mismatch here must abort startup, never degrade into
    // padded or truncated vectors at request time.
    let bundle = ModelBundle::load(Path::new(&config.data.model_path))
        .context("loading model bundle")?;

    let log = load_game_log(Path::new(&config.data.game_log_path))
        .context("loading game log")?;
    let summaries = load_team_summaries(Path::new(&config.data.team_stats_path))
        .context("loading team summaries")?;

    let service = PredictionService::new(
        log,
        bundle,
        summaries,
        config.ml.window,
        config.scoring.probability_scale,
    )
    .context("building serving context")?;

    let state = AppState {
        service: Arc::new(service),
    };

    let origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any);

    let app = create_routes()
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.server_addr())
        .await
        .context("binding server address")?;
    info!("Listening on {}", config.server_addr());
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}
