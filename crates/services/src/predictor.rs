use std::collections::HashMap;

use hoopcast_features::{
    predict_score, FeatureSource, FeatureVectorAssembler, RollingFeatureBuilder, SnapshotTable,
};
use hoopcast_models::{
    GameLog, GamePrediction, PredictError, PredictedScore, Result, TeamSummary,
};
use hoopcast_ml::ModelBundle;

/// League-average points per game, the last resort when a team has no season
/// summary, no rolling form and no raw scoring record.
const LEAGUE_AVG_POINTS: f64 = 110.0;

/// The serving context: owns the immutable dataset snapshot, the precomputed
/// rolling form and the validated model bundle. Constructed once at startup
/// and shared behind an `Arc`; every query method is a pure read, so
/// concurrent requests need no locking.
pub struct PredictionService {
    log: GameLog,
    snapshots: SnapshotTable,
    bundle: ModelBundle,
    summaries: HashMap<String, TeamSummary>,
    assembler: FeatureVectorAssembler,
    probability_scale: f64,
}

impl PredictionService {
    pub fn new(
        log: GameLog,
        bundle: ModelBundle,
        summaries: Vec<TeamSummary>,
        window: usize,
        probability_scale: f64,
    ) -> Result<Self> {
        bundle.validate()?;
        let snapshots = RollingFeatureBuilder::new(window).build(&log, &bundle.schema);
        let summaries = summaries
            .into_iter()
            .map(|summary| (summary.name.clone(), summary))
            .collect();
        Ok(Self {
            log,
            snapshots,
            bundle,
            summaries,
            assembler: FeatureVectorAssembler::new(),
            probability_scale,
        })
    }

    fn source(&self) -> FeatureSource<'_> {
        FeatureSource {
            log: &self.log,
            snapshots: &self.snapshots,
        }
    }

    /// Win probability and score line for one matchup. A team with zero
    /// recorded games is a hard error; partial data never is, the assembler's
    /// fallback ladder absorbs it.
    pub fn predict(&self, home_team: &str, away_team: &str) -> Result<GamePrediction> {
        for team in [home_team, away_team] {
            if !self.log.contains_team(team) {
                return Err(PredictError::UnknownTeam {
                    team: team.to_string(),
                });
            }
        }

        let features =
            self.assembler
                .assemble(&self.bundle.schema, home_team, away_team, self.source())?;
        let scaled = self.bundle.scaler.transform(&features)?;
        let home_win_prob = self.bundle.classifier.predict_probability(&scaled)?;

        let (home, away) = predict_score(
            self.scoring_average(home_team),
            self.scoring_average(away_team),
            home_win_prob,
            self.probability_scale,
        );

        let prediction = GamePrediction::new(
            home_team.to_string(),
            away_team.to_string(),
            home_win_prob,
            PredictedScore { home, away },
            self.bundle.model_version.clone(),
        )?;

        tracing::info!(
            home = home_team,
            away = away_team,
            p_home = format!("{:.3}", home_win_prob),
            score = format!("{home}-{away}"),
            "prediction served"
        );
        Ok(prediction)
    }

    /// Season average points, falling back to trailing form, then to the most
    /// recent raw score, then to the league average.
    fn scoring_average(&self, team: &str) -> f64 {
        if let Some(summary) = self.summaries.get(team) {
            return summary.points_per_game;
        }
        if let Some(pts) = self
            .snapshots
            .latest(team)
            .and_then(|snapshot| snapshot.value("pts"))
        {
            return pts;
        }
        self.log
            .latest(team)
            .and_then(|game| game.stat("pts"))
            .unwrap_or(LEAGUE_AVG_POINTS)
    }

    pub fn team_summary(&self, team: &str) -> Option<&TeamSummary> {
        self.summaries.get(team)
    }

    /// All season summaries, sorted by team name for stable display.
    pub fn team_summaries(&self) -> Vec<&TeamSummary> {
        let mut all: Vec<&TeamSummary> = self.summaries.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn model_version(&self) -> &str {
        &self.bundle.model_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hoopcast_models::{FeatureSchema, GameRecord};
    use hoopcast_ml::{LinearClassifier, RangeScaler};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample_log() -> GameLog {
        let mut records = Vec::new();
        for d in 1..=5 {
            records.push(
                GameRecord::new("CLE", "UTA", date(d))
                    .with_home(true)
                    .with_outcome(true)
                    .with_stat("pts", 112.0)
                    .with_stat("fga", 85.0),
            );
            records.push(
                GameRecord::new("UTA", "CLE", date(d))
                    .with_home(false)
                    .with_outcome(false)
                    .with_stat("pts", 108.0)
                    .with_stat("fga", 83.0),
            );
        }
        GameLog::from_records(records).unwrap()
    }

    /// A bundle with zero weights: every query scores an even 0.5.
    fn neutral_bundle() -> ModelBundle {
        let schema = FeatureSchema::current();
        let width = schema.len();
        ModelBundle::new(
            schema,
            RangeScaler::identity(width),
            LinearClassifier::new(vec![0.0; width], 0.0),
        )
        .unwrap()
    }

    fn summaries() -> Vec<TeamSummary> {
        [("CLE", 112.0), ("UTA", 108.0)]
            .iter()
            .map(|(name, pts)| TeamSummary {
                name: (*name).to_string(),
                games_played: 5,
                wins: if *name == "CLE" { 5 } else { 0 },
                losses: if *name == "CLE" { 0 } else { 5 },
                win_percentage: if *name == "CLE" { 1.0 } else { 0.0 },
                points_per_game: *pts,
                field_goal_percentage: 0.48,
                three_point_percentage: 0.36,
                free_throw_percentage: 0.78,
                rebounds_per_game: 44.0,
                assists_per_game: 25.0,
                steals_per_game: 7.0,
                blocks_per_game: 5.0,
                turnovers_per_game: 13.0,
            })
            .collect()
    }

    fn service() -> PredictionService {
        PredictionService::new(sample_log(), neutral_bundle(), summaries(), 10, 20.0).unwrap()
    }

    #[test]
    fn test_even_model_returns_averages() {
        let prediction = service().predict("CLE", "UTA").unwrap();
        assert!((prediction.home_win_probability - 0.5).abs() < 1e-9);
        assert_eq!(prediction.predicted_score.home, 112);
        assert_eq!(prediction.predicted_score.away, 108);
    }

    #[test]
    fn test_unknown_team_is_fatal() {
        let result = service().predict("CLE", "ZZZ");
        assert!(matches!(
            result,
            Err(PredictError::UnknownTeam { team }) if team == "ZZZ"
        ));
    }

    #[test]
    fn test_repeat_queries_identical() {
        let service = service();
        let first = service.predict("CLE", "UTA").unwrap();
        let second = service.predict("CLE", "UTA").unwrap();
        assert_eq!(first.home_win_probability, second.home_win_probability);
        assert_eq!(first.predicted_score, second.predicted_score);
    }

    #[test]
    fn test_scoring_average_fallback_without_summary() {
        let service = PredictionService::new(sample_log(), neutral_bundle(), vec![], 10, 20.0)
            .unwrap();
        let prediction = service.predict("CLE", "UTA").unwrap();
        // Rolling scoring average stands in for the missing season summary.
        assert_eq!(prediction.predicted_score.home, 112);
        assert_eq!(prediction.predicted_score.away, 108);
    }

    #[test]
    fn test_summaries_sorted() {
        let service = service();
        let all = service.team_summaries();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "CLE");
        assert_eq!(all[1].name, "UTA");
    }
}
