use std::collections::{BTreeSet, HashMap};

use hoopcast_models::{FeatureSchema, GameLog, RollingSnapshot};

/// Trailing window size used by the current model generation.
pub const DEFAULT_WINDOW: usize = 10;

/// Fewer prior games than this and a team's form is undefined: the snapshot
/// is absent, not zero.
pub const MIN_PRIOR_GAMES: usize = 3;

/// Snapshots for every (team, position) pair, parallel to each team's
/// chronological game order in the log, plus one trailing entry per team:
/// the form entering the team's next, not yet recorded fixture. `latest`
/// therefore covers the most recent game, which is what serving reads.
#[derive(Debug, Clone, Default)]
pub struct SnapshotTable {
    by_team: HashMap<String, Vec<Option<RollingSnapshot>>>,
}

impl SnapshotTable {
    /// Snapshot valid for a team's game at `index` (its trailing form entering
    /// that game), if enough history existed.
    pub fn get(&self, team: &str, index: usize) -> Option<&RollingSnapshot> {
        self.by_team.get(team)?.get(index)?.as_ref()
    }

    /// The team's most recent defined snapshot.
    pub fn latest(&self, team: &str) -> Option<&RollingSnapshot> {
        self.by_team
            .get(team)?
            .iter()
            .rev()
            .find_map(Option::as_ref)
    }

    pub fn team_count(&self) -> usize {
        self.by_team.len()
    }
}

/// Computes per-team trailing-window averages over strictly prior games.
///
/// The tracked columns are every numeric stat column in the log minus the
/// schema's declared exclusion set, resolved once here rather than re-derived
/// per request.
#[derive(Debug, Clone)]
pub struct RollingFeatureBuilder {
    window: usize,
    min_prior_games: usize,
}

impl RollingFeatureBuilder {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            min_prior_games: MIN_PRIOR_GAMES,
        }
    }

    pub fn with_min_prior_games(mut self, min: usize) -> Self {
        self.min_prior_games = min.max(1);
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn build(&self, log: &GameLog, schema: &FeatureSchema) -> SnapshotTable {
        let tracked: BTreeSet<String> = log
            .stat_columns()
            .into_iter()
            .filter(|column| !schema.is_excluded_column(column))
            .collect();

        let mut by_team = HashMap::new();
        for team in log.teams() {
            let snapshots = self.build_team(log, team, &tracked);
            by_team.insert(team.to_string(), snapshots);
        }

        tracing::debug!(
            teams = by_team.len(),
            tracked_columns = tracked.len(),
            window = self.window,
            "rolling snapshots built"
        );

        SnapshotTable { by_team }
    }

    /// Sliding sums per stat: push position i-1 when moving to position i,
    /// evict positions older than the window. Only games strictly before the
    /// as-of position ever enter a sum; this is the no-lookahead invariant.
    fn build_team(
        &self,
        log: &GameLog,
        team: &str,
        tracked: &BTreeSet<String>,
    ) -> Vec<Option<RollingSnapshot>> {
        let games = log.team_games(team);
        let mut snapshots = Vec::with_capacity(games.len() + 1);

        // Per-stat running sum and count of present observations in window.
        let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();

        for i in 0..=games.len() {
            if i >= self.min_prior_games {
                let mut values = HashMap::new();
                for (stat, &(sum, count)) in &sums {
                    if count > 0 {
                        let mut mean = sum / count as f64;
                        if *stat == "won" {
                            // Trailing win rate is discretized to one decimal
                            // so training buckets don't fragment.
                            mean = (mean * 10.0).round() / 10.0;
                        }
                        values.insert((*stat).to_string(), mean);
                    }
                }
                snapshots.push(Some(RollingSnapshot {
                    team: team.to_string(),
                    // The trailing entry has no fixture yet; it carries the
                    // date of the last game it covers.
                    as_of: match games.get(i) {
                        Some(game) => game.date,
                        None => games[i - 1].date,
                    },
                    games_used: i.min(self.window),
                    values,
                }));
            } else {
                snapshots.push(None);
            }

            let Some(game) = games.get(i) else {
                break;
            };
            // Admit game i into the window for position i + 1.
            for stat in tracked {
                if let Some(value) = game.stat(stat) {
                    let entry = sums.entry(stat.as_str()).or_insert((0.0, 0));
                    entry.0 += value;
                    entry.1 += 1;
                }
            }
            // Evict the game that just fell out of the trailing window.
            if i + 1 > self.window {
                let evicted = &games[i - self.window];
                for stat in tracked {
                    if let Some(value) = evicted.stat(stat) {
                        if let Some(entry) = sums.get_mut(stat.as_str()) {
                            entry.0 -= value;
                            entry.1 -= 1;
                        }
                    }
                }
            }
        }

        snapshots
    }
}

impl Default for RollingFeatureBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}
