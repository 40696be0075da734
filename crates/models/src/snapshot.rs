use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Trailing-window averages for one team as of one game in its schedule.
/// Computed over strictly prior games only; a snapshot never sees the as-of
/// game itself or anything after it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RollingSnapshot {
    pub team: String,
    /// Date of the game this snapshot is valid for, never included in the
    /// averages. A snapshot past the end of a team's schedule carries the
    /// date of the last game it covers.
    pub as_of: NaiveDate,
    /// Number of prior games the averages were taken over.
    pub games_used: usize,
    /// Averaged stat values keyed by the raw stat's base name.
    pub values: HashMap<String, f64>,
}

impl RollingSnapshot {
    pub fn value(&self, stat: &str) -> Option<f64> {
        self.values.get(stat).copied()
    }

    /// Trailing win rate over the window, if outcomes were tracked.
    pub fn won_rate(&self) -> Option<f64> {
        self.value("won")
    }
}

/// Training-time row: a team's own trailing form at its current game joined
/// with the next opponent's trailing form entering the same fixture.
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub team: String,
    pub opponent: String,
    /// Date of the upcoming fixture both snapshots are aligned to.
    pub date: NaiveDate,
    /// Whether the team plays the upcoming fixture at home.
    pub home_next: bool,
    pub own: RollingSnapshot,
    pub opp: RollingSnapshot,
    /// Raw stat values from the team's last game strictly before the fixture.
    /// Raw-named schema entries resolve from these, the same tier serving
    /// reads via the log's most recent record.
    pub own_raw: HashMap<String, f64>,
    /// The opponent's counterpart, from its last game before the fixture.
    pub opp_raw: HashMap<String, f64>,
    /// Outcome of the upcoming fixture; `None` at the end of a team's
    /// recorded history, which excludes the row from supervised training.
    pub label: Option<bool>,
}
