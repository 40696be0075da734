use std::collections::HashMap;

use hoopcast_models::{
    away_base, default_value, rolling_base, FeatureSchema, FixtureRow, GameLog, PredictError,
    Result, RollingSnapshot, HOME_COURT,
};

use crate::rolling::SnapshotTable;

/// Read-only view the assembler resolves against: the immutable game log plus
/// its precomputed snapshot table.
#[derive(Debug, Clone, Copy)]
pub struct FeatureSource<'a> {
    pub log: &'a GameLog,
    pub snapshots: &'a SnapshotTable,
}

/// Resolves a feature schema to a concrete numeric vector for one matchup.
///
/// Every entry resolves independently through a layered fallback:
/// computed rolling statistic, then the side's most recent raw value, then a
/// domain-typical default. A feature is never silently zeroed. The output
/// length always equals the schema length, so the classifier's expected input
/// width can never drift.
#[derive(Debug, Clone, Default)]
pub struct FeatureVectorAssembler;

impl FeatureVectorAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Pure function of the snapshot state; safe to call repeatedly and
    /// concurrently. Fails only when neither team has any game history.
    pub fn assemble(
        &self,
        schema: &FeatureSchema,
        home_team: &str,
        away_team: &str,
        source: FeatureSource<'_>,
    ) -> Result<Vec<f64>> {
        if !source.log.contains_team(home_team) && !source.log.contains_team(away_team) {
            return Err(PredictError::NoData {
                home: home_team.to_string(),
                away: away_team.to_string(),
            });
        }

        let vector = schema
            .features()
            .map(|name| {
                if name == HOME_COURT {
                    return 1.0;
                }
                // An `_away` suffix means the stat is read from the upcoming
                // opponent's own perspective.
                let (team, side_name) = match away_base(name) {
                    Some(base) => (away_team, base),
                    None => (home_team, name),
                };
                resolve(team, side_name, source)
            })
            .collect();

        Ok(vector)
    }
}

/// Tiered resolution of one own-perspective feature name against one team.
/// Total: always produces a value.
fn resolve(team: &str, name: &str, source: FeatureSource<'_>) -> f64 {
    if let Some(base) = rolling_base(name) {
        if let Some(value) = source
            .snapshots
            .latest(team)
            .and_then(|snapshot| snapshot.value(base))
        {
            return value;
        }
        // Insufficient history for a rolling value; fall back to the most
        // recent raw observation of the same stat.
        if let Some(value) = source.log.latest(team).and_then(|game| game.stat(base)) {
            tracing::debug!(team, feature = name, "raw-value fallback");
            return value;
        }
        return default_value(base);
    }

    if let Some(value) = source.log.latest(team).and_then(|game| game.stat(name)) {
        return value;
    }
    tracing::debug!(team, feature = name, "domain-default fallback");
    default_value(name)
}

/// Training-time counterpart of `assemble`: resolves the schema against an
/// aligned fixture row instead of live lookups. Same ordered names, same tier
/// order per entry, so training and serving can never diverge on what a
/// feature means: rolling names read the row's snapshot, raw names read the
/// row's pre-fixture raw values, defaults close both ladders.
pub fn assemble_training_row(schema: &FeatureSchema, row: &FixtureRow) -> Vec<f64> {
    schema
        .features()
        .map(|name| {
            if name == HOME_COURT {
                return if row.home_next { 1.0 } else { 0.0 };
            }
            let (snapshot, raw, side_name) = match away_base(name) {
                Some(base) => (&row.opp, &row.opp_raw, base),
                None => (&row.own, &row.own_raw, name),
            };
            resolve_from_row(snapshot, raw, side_name)
        })
        .collect()
}

fn resolve_from_row(snapshot: &RollingSnapshot, raw: &HashMap<String, f64>, name: &str) -> f64 {
    if let Some(base) = rolling_base(name) {
        return snapshot
            .value(base)
            .or_else(|| raw.get(base).copied())
            .unwrap_or_else(|| default_value(base));
    }
    raw.get(name)
        .copied()
        .unwrap_or_else(|| default_value(name))
}
