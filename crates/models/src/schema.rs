use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{PredictError, Result};

/// Constant policy feature: 1.0 for the home side of a query.
pub const HOME_COURT: &str = "home_court";

/// Schema-name suffix marking a trailing-window average of the base stat.
pub const ROLLING_SUFFIX: &str = "_10";

/// Schema-name suffix marking a stat resolved from the upcoming opponent's
/// perspective: the away team's own value of the equivalently-named stat.
pub const AWAY_SUFFIX: &str = "_away";

/// Strips the opponent-perspective suffix, if present.
pub fn away_base(name: &str) -> Option<&str> {
    name.strip_suffix(AWAY_SUFFIX)
}

/// Strips the rolling suffix, if present.
pub fn rolling_base(name: &str) -> Option<&str> {
    name.strip_suffix(ROLLING_SUFFIX)
}

/// Domain-typical default for a base stat name, used when neither a rolling
/// average nor a raw recent value exists. Zero is never a meaningful
/// basketball default, so every pattern maps to a league-plausible constant.
pub fn default_value(base: &str) -> f64 {
    if base == HOME_COURT {
        1.0
    } else if base.contains("fg_pct") {
        0.45
    } else if base.contains("ft_pct") {
        0.75
    } else if base.contains("_pct") || base == "won" {
        0.1
    } else if base == "mp" {
        // Five players, 48 minutes.
        240.0
    } else {
        5.0
    }
}

/// Ordered, named list of features the classifier expects, plus the declared
/// exclusion set checked once at build time. Persisted alongside the trained
/// classifier and scaler; exactly one schema version per bundle, shared
/// verbatim between training and serving.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSchema {
    pub version: String,
    features: Vec<String>,
    excluded: BTreeSet<String>,
}

impl FeatureSchema {
    pub fn new(
        version: impl Into<String>,
        features: Vec<String>,
        excluded: BTreeSet<String>,
    ) -> Result<Self> {
        let schema = Self {
            version: version.into(),
            features,
            excluded,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// The schema the current model generation is trained against. Usage-rate
    /// columns are excluded outright: they are player-level constructs with no
    /// team-level meaning.
    pub fn current() -> Self {
        let features = [
            "fga",
            "fg_opp",
            "orb_opp",
            "stl_pct_opp",
            "pf_max_opp",
            "orb_pct_max_opp",
            "efg_pct_10",
            "fg_max_10",
            "plus_minus_max_10",
            "trb_pct_max_10",
            "blk_opp_10",
            "drb_pct_opp_10",
            "ft_pct_max_opp_10",
            "plus_minus_max_opp_10",
            "efg_pct_max_opp_10",
            HOME_COURT,
            "mp_10_away",
            "gmsc_max_10_away",
            "blk_pct_opp_10_away",
            "ft_pct_max_opp_10_away",
            "ast_max_opp_10_away",
            "plus_minus_max_opp_10_away",
        ]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

        let excluded = ["usg_pct"].iter().map(|s| (*s).to_string()).collect();

        // The literal lists above are fixed, so this cannot fail.
        Self::new("v2", features, excluded)
            .expect("built-in schema must be valid")
    }

    fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(PredictError::InvalidSchema(
                "schema lists no features".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(PredictError::InvalidSchema(format!(
                    "duplicate feature: {name}"
                )));
            }
            let side = away_base(name).unwrap_or(name);
            let base = rolling_base(side).unwrap_or(side);
            if self.is_excluded_column(base) {
                return Err(PredictError::InvalidSchema(format!(
                    "feature {name} resolves to excluded stat {base}"
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }

    /// Whether a raw stat column belongs to an excluded family. Checked once
    /// when the rolling builder derives its tracked columns, never per
    /// request.
    pub fn is_excluded_column(&self, column: &str) -> bool {
        self.excluded.iter().any(|base| {
            column == base || column.starts_with(&format!("{base}_"))
        })
    }
}
