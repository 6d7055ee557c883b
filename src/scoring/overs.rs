//! Conversions between legal-ball counts and the "overs.balls" display form.
//!
//! Cricket overs are not decimal quantities: 6 legal balls make an over, so
//! 7 legal balls display as "1.1", never "1.17". All aggregation in this crate
//! therefore works in whole legal balls and only converts at the display edge.

/// Converts a count of legal deliveries into the conventional display form.
///
/// `0 -> "0.0"`, `7 -> "1.1"`, `120 -> "20.0"`.
pub fn balls_to_overs(legal_balls: u32) -> String {
    format!("{}.{}", legal_balls / 6, legal_balls % 6)
}

/// Parses an overs display value back into a legal-ball count.
///
/// A value with no fractional part is a whole number of overs. Only the first
/// fractional digit is significant and it is clamped to 5 — an over never has
/// a stored "6th ball". Malformed input falls back to 0 so that read paths
/// keep rendering instead of failing.
pub fn overs_to_balls(overs: &str) -> u32 {
    let value = overs.trim();

    let (whole_part, fraction_part) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (value, ""),
    };

    let whole: u32 = match whole_part.parse() {
        Ok(n) => n,
        Err(_) => return 0,
    };

    let balls = fraction_part
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0)
        .min(5);

    whole * 6 + balls
}

/// Runs scored per over (6 legal balls). Zero when no legal ball has been
/// bowled yet, never NaN or infinity.
pub fn run_rate(runs: u32, legal_balls: u32) -> f64 {
    if legal_balls == 0 {
        return 0.0;
    }
    f64::from(runs) * 6.0 / f64::from(legal_balls)
}

/// Rounds to 2 decimal places for scoreboard display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to 3 decimal places, the convention for net run rate.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0.0")]
    #[case(1, "0.1")]
    #[case(5, "0.5")]
    #[case(6, "1.0")]
    #[case(7, "1.1")]
    #[case(12, "2.0")]
    #[case(119, "19.5")]
    #[case(120, "20.0")]
    fn formats_legal_balls_as_overs(#[case] balls: u32, #[case] expected: &str) {
        assert_eq!(balls_to_overs(balls), expected);
    }

    #[rstest]
    #[case("0.0", 0)]
    #[case("1.1", 7)]
    #[case("20.0", 120)]
    #[case("20", 120)]
    #[case("4.5", 29)]
    fn parses_overs_back_to_balls(#[case] overs: &str, #[case] expected: u32) {
        assert_eq!(overs_to_balls(overs), expected);
    }

    #[test]
    fn round_trips_every_ball_count() {
        for balls in 0..=600 {
            assert_eq!(overs_to_balls(&balls_to_overs(balls)), balls);
        }
    }

    #[rstest]
    #[case("3.7", 23)] // fractional digit clamped to 5
    #[case("3.9", 23)]
    #[case("1.1667", 7)] // only the first fractional digit counts
    #[case("", 0)]
    #[case("abc", 0)]
    #[case("-2.1", 0)]
    fn tolerates_malformed_overs_values(#[case] overs: &str, #[case] expected: u32) {
        assert_eq!(overs_to_balls(overs), expected);
    }

    #[test]
    fn run_rate_guards_against_zero_balls() {
        assert_eq!(run_rate(0, 0), 0.0);
        assert_eq!(run_rate(50, 0), 0.0);
    }

    #[test]
    fn run_rate_is_runs_per_six_balls() {
        assert_eq!(run_rate(120, 120), 6.0);
        assert_eq!(round2(run_rate(100, 100)), 6.0);
        assert_eq!(round2(run_rate(83, 60)), 8.3);
    }

    #[test]
    fn run_rate_is_never_nan_for_valid_input() {
        for runs in 0..50 {
            for balls in 0..50 {
                assert!(run_rate(runs, balls).is_finite());
            }
        }
    }

    #[test]
    fn rounding_helpers() {
        assert_eq!(round2(8.333333), 8.33);
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(-0.6667), -0.667);
    }
}
