use serde::Deserialize;
use std::path::Path;

use hoopcast_models::{GameLog, GameRecord, PredictError, Result, TeamSummary};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Meta columns typed explicitly; everything else parses as a numeric stat.
const META_COLUMNS: &[&str] = &["", "index", "team", "team_opp", "date", "home", "won", "season"];

/// Canonicalizes a raw CSV stat header into a schema-safe identifier:
/// `fg%` -> `fg_pct`, `+/-_max` -> `plus_minus_max`, `3pa` -> `fg3a`.
pub fn normalize_stat_name(header: &str) -> String {
    let mut name = header.trim().to_lowercase();
    name = name.replace("+/-", "plus_minus");
    name = name.replace('%', "_pct");
    if let Some(rest) = name.strip_prefix("3p") {
        name = format!("fg3{rest}");
    }
    name
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

/// Loads the per-team per-game snapshot the whole system runs against.
/// Required columns: `team`, `team_opp`, `date`. Blank or non-numeric stat
/// cells are skipped, not zeroed; a malformed required field is an error.
pub fn load_game_log(path: &Path) -> Result<GameLog> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));
    let team_idx = find("team").ok_or_else(|| PredictError::MissingColumn {
        column: "team".to_string(),
    })?;
    let opp_idx = find("team_opp").ok_or_else(|| PredictError::MissingColumn {
        column: "team_opp".to_string(),
    })?;
    let date_idx = find("date").ok_or_else(|| PredictError::MissingColumn {
        column: "date".to_string(),
    })?;
    let home_idx = find("home");
    let won_idx = find("won");

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let team = row.get(team_idx).unwrap_or_default().trim();
        let opponent = row.get(opp_idx).unwrap_or_default().trim();
        let raw_date = row.get(date_idx).unwrap_or_default().trim();
        if team.is_empty() || opponent.is_empty() {
            continue;
        }
        let date = chrono::NaiveDate::parse_from_str(raw_date, DATE_FORMAT)
            .map_err(|e| PredictError::InvalidRecord(format!("bad date {raw_date:?}: {e}")))?;

        let mut record = GameRecord::new(team, opponent, date);
        if let Some(idx) = home_idx {
            record.is_home = row
                .get(idx)
                .and_then(parse_flag)
                .unwrap_or(false);
        }
        if let Some(won) = won_idx.and_then(|idx| row.get(idx)).and_then(parse_flag) {
            record = record.with_outcome(won);
        }

        for (header, value) in headers.iter().zip(row.iter()) {
            let header = header.trim();
            if META_COLUMNS
                .iter()
                .any(|meta| header.eq_ignore_ascii_case(meta))
            {
                continue;
            }
            if let Ok(value) = value.trim().parse::<f64>() {
                record.stats.insert(normalize_stat_name(header), value);
            }
        }
        records.push(record);
    }

    let log = GameLog::from_records(records)?;
    tracing::info!(
        games = log.len(),
        teams = log.teams().count(),
        path = %path.display(),
        "game log loaded"
    );
    Ok(log)
}

/// Raw season-summary row as exported; projected into `TeamSummary`.
#[derive(Debug, Deserialize)]
struct TeamSeasonRow {
    #[serde(rename = "Team")]
    team: String,
    #[serde(rename = "GP")]
    games_played: u32,
    #[serde(rename = "W")]
    wins: u32,
    #[serde(rename = "L")]
    losses: u32,
    #[serde(rename = "PTS")]
    points: f64,
    #[serde(rename = "FG%")]
    fg_pct: f64,
    #[serde(rename = "3P%")]
    fg3_pct: f64,
    #[serde(rename = "FT%")]
    ft_pct: f64,
    #[serde(rename = "TRB")]
    rebounds: f64,
    #[serde(rename = "AST")]
    assists: f64,
    #[serde(rename = "STL")]
    steals: f64,
    #[serde(rename = "BLK")]
    blocks: f64,
    #[serde(rename = "TOV")]
    turnovers: f64,
}

impl From<TeamSeasonRow> for TeamSummary {
    fn from(row: TeamSeasonRow) -> Self {
        let win_percentage = if row.games_played > 0 {
            f64::from(row.wins) / f64::from(row.games_played)
        } else {
            0.0
        };
        TeamSummary {
            name: row.team,
            games_played: row.games_played,
            wins: row.wins,
            losses: row.losses,
            win_percentage,
            points_per_game: row.points,
            field_goal_percentage: row.fg_pct,
            three_point_percentage: row.fg3_pct,
            free_throw_percentage: row.ft_pct,
            rebounds_per_game: row.rebounds,
            assists_per_game: row.assists,
            steals_per_game: row.steals,
            blocks_per_game: row.blocks,
            turnovers_per_game: row.turnovers,
        }
    }
}

pub fn load_team_summaries(path: &Path) -> Result<Vec<TeamSummary>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut summaries = Vec::new();
    for row in reader.deserialize::<TeamSeasonRow>() {
        summaries.push(row?.into());
    }
    tracing::info!(teams = summaries.len(), path = %path.display(), "team summaries loaded");
    Ok(summaries)
}
