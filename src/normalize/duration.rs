//! Free-text duration parsing ("90 min", "2 Seasons") into minutes.

use serde::{Deserialize, Serialize};

/// Unit prefix marking a duration already expressed in minutes.
pub const MINUTES_UNIT_PREFIX: &str = "min";

/// Heuristic runtime of one season: episodes per season times minutes per
/// episode. Not a measured quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonApproximation {
    pub episodes_per_season: u32,
    pub minutes_per_episode: u32,
}

impl SeasonApproximation {
    pub const DEFAULT: SeasonApproximation = SeasonApproximation {
        episodes_per_season: 10,
        minutes_per_episode: 45,
    };

    pub fn minutes_per_season(&self) -> f64 {
        self.episodes_per_season as f64 * self.minutes_per_episode as f64
    }
}

impl Default for SeasonApproximation {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A duration split into its numeric and unit tokens.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedDuration {
    /// `None` when the numeric token is missing, not a number, negative or
    /// not finite.
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl ParsedDuration {
    pub fn is_minutes(&self) -> bool {
        self.unit
            .as_deref()
            .is_some_and(|unit| unit.starts_with(MINUTES_UNIT_PREFIX))
    }

    /// Minutes for this duration: the value itself for a minutes unit,
    /// otherwise the value counted as seasons.
    pub fn minutes(&self, seasons: &SeasonApproximation) -> Option<f64> {
        let value = self.value?;
        if self.is_minutes() {
            Some(value)
        } else {
            Some(value * seasons.minutes_per_season())
        }
    }
}

/// Splits `raw` on its first whitespace boundary into a numeric token and a
/// unit token. Never fails: anything unparseable yields a null value.
pub fn parse_duration(raw: Option<&str>) -> ParsedDuration {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return ParsedDuration::default();
    };

    let (number, unit) = match raw.split_once(char::is_whitespace) {
        Some((number, unit)) => (number, Some(unit.trim_start())),
        None => (raw, None),
    };

    let value = number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0);

    ParsedDuration {
        value,
        unit: unit.filter(|u| !u.is_empty()).map(String::from),
    }
}

/// `parse_duration` followed by the minutes conversion.
pub fn duration_minutes(raw: Option<&str>, seasons: &SeasonApproximation) -> Option<f64> {
    parse_duration(raw).minutes(seasons)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEASONS: SeasonApproximation = SeasonApproximation::DEFAULT;

    #[test]
    fn minutes_are_kept_as_is() {
        assert_eq!(duration_minutes(Some("90 min"), &SEASONS), Some(90.0));
        assert_eq!(duration_minutes(Some("1 min"), &SEASONS), Some(1.0));
        assert_eq!(duration_minutes(Some("125 mins"), &SEASONS), Some(125.0));
    }

    #[test]
    fn seasons_use_the_approximation() {
        assert_eq!(duration_minutes(Some("2 Seasons"), &SEASONS), Some(900.0));
        assert_eq!(duration_minutes(Some("1 Season"), &SEASONS), Some(450.0));
    }

    #[test]
    fn unit_prefix_is_case_sensitive() {
        // "Min" is not the minutes prefix, so it is treated like seasons
        assert_eq!(duration_minutes(Some("3 Min"), &SEASONS), Some(1350.0));
    }

    #[test]
    fn missing_unit_takes_season_branch() {
        let parsed = parse_duration(Some("4"));
        assert_eq!(parsed.value, Some(4.0));
        assert_eq!(parsed.unit, None);
        assert_eq!(parsed.minutes(&SEASONS), Some(1800.0));
    }

    #[test]
    fn null_and_unparseable_durations_are_null() {
        assert_eq!(duration_minutes(None, &SEASONS), None);
        assert_eq!(duration_minutes(Some(""), &SEASONS), None);
        assert_eq!(duration_minutes(Some("   "), &SEASONS), None);
        assert_eq!(duration_minutes(Some("unknown min"), &SEASONS), None);
        assert_eq!(duration_minutes(Some("NaN min"), &SEASONS), None);
        assert_eq!(duration_minutes(Some("-5 min"), &SEASONS), None);
    }

    #[test]
    fn splits_on_first_whitespace_only() {
        let parsed = parse_duration(Some("74 min  extended cut"));
        assert_eq!(parsed.value, Some(74.0));
        assert_eq!(parsed.unit.as_deref(), Some("min  extended cut"));
        assert!(parsed.is_minutes());
    }

    #[test]
    fn approximation_is_overridable() {
        let short_seasons = SeasonApproximation {
            episodes_per_season: 8,
            minutes_per_episode: 30,
        };
        assert_eq!(duration_minutes(Some("2 Seasons"), &short_seasons), Some(480.0));
    }
}
