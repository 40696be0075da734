use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use crate::error::{PredictError, Result};

/// One team's participation in one game. A completed game appears twice in a
/// log, once per side, with reciprocal `team`/`opponent` fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    pub team: String,
    pub opponent: String,
    pub date: NaiveDate,
    pub is_home: bool,
    /// Known only for completed games.
    pub won: Option<bool>,
    /// Raw per-game stat columns. Own stats under their base name, the
    /// opponent's equivalents under an `_opp` suffix, per-game player maxima
    /// under `_max`.
    pub stats: HashMap<String, f64>,
}

impl GameRecord {
    pub fn new(team: impl Into<String>, opponent: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            team: team.into(),
            opponent: opponent.into(),
            date,
            is_home: false,
            won: None,
            stats: HashMap::new(),
        }
    }

    pub fn with_home(mut self, is_home: bool) -> Self {
        self.is_home = is_home;
        self
    }

    pub fn with_outcome(mut self, won: bool) -> Self {
        self.won = Some(won);
        // The outcome doubles as a rollable stat so trailing win rate falls
        // out of the same averaging pass as every other column.
        self.stats.insert("won".to_string(), if won { 1.0 } else { 0.0 });
        self
    }

    pub fn with_stat(mut self, name: impl Into<String>, value: f64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }

    pub fn stat(&self, name: &str) -> Option<f64> {
        self.stats.get(name).copied()
    }
}

/// Immutable, time-ordered game log. Records are sorted by `(team, date)` at
/// construction so each team's games occupy one contiguous chronological run;
/// the log is never mutated after that.
#[derive(Debug, Clone)]
pub struct GameLog {
    records: Vec<GameRecord>,
    team_ranges: HashMap<String, Range<usize>>,
}

impl GameLog {
    pub fn from_records(mut records: Vec<GameRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(PredictError::EmptyDataset);
        }
        records.sort_by(|a, b| a.team.cmp(&b.team).then(a.date.cmp(&b.date)));

        let mut team_ranges: HashMap<String, Range<usize>> = HashMap::new();
        let mut start = 0;
        for i in 1..=records.len() {
            if i == records.len() || records[i].team != records[start].team {
                team_ranges.insert(records[start].team.clone(), start..i);
                start = i;
            }
        }

        Ok(Self { records, team_ranges })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_team(&self, team: &str) -> bool {
        self.team_ranges.contains_key(team)
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.team_ranges.keys().map(String::as_str)
    }

    /// A team's games in chronological order. Empty slice for unknown teams.
    pub fn team_games(&self, team: &str) -> &[GameRecord] {
        match self.team_ranges.get(team) {
            Some(range) => &self.records[range.clone()],
            None => &[],
        }
    }

    /// The team's most recent game record.
    pub fn latest(&self, team: &str) -> Option<&GameRecord> {
        self.team_games(team).last()
    }

    /// Union of raw stat column names across the whole log.
    pub fn stat_columns(&self) -> BTreeSet<String> {
        let mut columns = BTreeSet::new();
        for record in &self.records {
            for name in record.stats.keys() {
                if !columns.contains(name) {
                    columns.insert(name.clone());
                }
            }
        }
        columns
    }
}
