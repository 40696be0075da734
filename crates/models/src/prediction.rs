use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};

/// Matchup requested by a caller. Ephemeral, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionQuery {
    pub home_team: String,
    pub away_team: String,
}

/// Predicted score line, rounded to whole points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictedScore {
    pub home: i32,
    pub away: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GamePrediction {
    pub winner: String,
    pub home_team: String,
    pub away_team: String,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub predicted_score: PredictedScore,
    pub model_version: String,
    pub predicted_at: DateTime<Utc>,
}

impl GamePrediction {
    pub fn new(
        home_team: String,
        away_team: String,
        home_win_probability: f64,
        predicted_score: PredictedScore,
        model_version: String,
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&home_win_probability) {
            return Err(PredictError::InvalidProbability {
                prob: home_win_probability,
            });
        }

        let winner = if home_win_probability > 0.5 {
            home_team.clone()
        } else {
            away_team.clone()
        };

        Ok(Self {
            winner,
            home_team,
            away_team,
            home_win_probability,
            away_win_probability: 1.0 - home_win_probability,
            predicted_score,
            model_version,
            predicted_at: Utc::now(),
        })
    }
}

/// Season aggregates for one team, projected straight from the season summary
/// snapshot for display. No algorithmic contract attaches to these numbers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSummary {
    pub name: String,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_percentage: f64,
    pub points_per_game: f64,
    pub field_goal_percentage: f64,
    pub three_point_percentage: f64,
    pub free_throw_percentage: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
    pub steals_per_game: f64,
    pub blocks_per_game: f64,
    pub turnovers_per_game: f64,
}
