/// Probability-to-margin scale: a 100% favorite moves the line by ten points
/// each way.
pub const DEFAULT_PROBABILITY_SCALE: f64 = 20.0;

/// Heuristic score line from each side's scoring average and the classifier's
/// win-probability margin. Pure and total; the probability is already in
/// [0, 1] by classifier contract.
///
/// `margin = (p - 0.5) * k`; home gets the margin, away gives it back.
pub fn predict_score(
    home_avg_points: f64,
    away_avg_points: f64,
    home_win_probability: f64,
    k: f64,
) -> (i32, i32) {
    let margin = (home_win_probability - 0.5) * k;
    let home = (home_avg_points + margin).round() as i32;
    let away = (away_avg_points - margin).round() as i32;
    (home, away)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_game_keeps_averages() {
        let (home, away) = predict_score(112.4, 108.0, 0.5, DEFAULT_PROBABILITY_SCALE);
        assert_eq!(home, 112);
        assert_eq!(away, 108);
    }

    #[test]
    fn test_reference_case() {
        // p = 0.62 at K = 20 gives a 2.4 point swing each way.
        let (home, away) = predict_score(112.0, 108.0, 0.62, 20.0);
        assert_eq!(home, 114);
        assert_eq!(away, 106);
    }

    #[test]
    fn test_monotonic_in_probability() {
        let mut last = predict_score(110.0, 110.0, 0.0, DEFAULT_PROBABILITY_SCALE);
        for step in 1..=20 {
            let p = f64::from(step) / 20.0;
            let next = predict_score(110.0, 110.0, p, DEFAULT_PROBABILITY_SCALE);
            assert!(next.0 >= last.0);
            assert!(next.1 <= last.1);
            last = next;
        }
        // Full range swings the line by half of K each way.
        assert_eq!(predict_score(110.0, 110.0, 1.0, 20.0), (120, 100));
        assert_eq!(predict_score(110.0, 110.0, 0.0, 20.0), (100, 120));
    }

    #[test]
    fn test_underdog_home_loses_margin() {
        let (home, away) = predict_score(105.0, 111.0, 0.3, 20.0);
        assert_eq!(home, 101);
        assert_eq!(away, 115);
    }
}
