use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub ml: MlConfig,
    pub scoring: ScoringConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub game_log_path: String,
    pub team_stats_path: String,
    pub model_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlConfig {
    pub window: usize,
    pub max_iterations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Probability-to-margin scale in the score heuristic.
    pub probability_scale: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3001)?
            .set_default("data.game_log_path", "data/nba_games.csv")?
            .set_default("data.team_stats_path", "data/team_stats.csv")?
            .set_default("data.model_path", "models/logistic_model.json")?
            .set_default("ml.window", 10)?
            .set_default("ml.max_iterations", 1000)?
            .set_default("scoring.probability_scale", 20.0)?
            .set_default(
                "cors.allowed_origins",
                vec![
                    "http://localhost:5173".to_string(),
                    "http://localhost:5174".to_string(),
                ],
            )?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add in settings from environment variables
            .add_source(Environment::new().separator("_"))
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
