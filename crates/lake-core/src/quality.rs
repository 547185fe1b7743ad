//! Water-quality trend classification and overall quality verdict

use crate::parameters::{Parameter, Polarity, TRACKED_PARAMETERS};
use crate::rollups::Accumulator;
use crate::types::{ParameterTrend, QualityVerdict, TrendDirection, WaterQualityReading};
use serde::{Deserialize, Serialize};

/// Percent change beyond which a parameter is no longer stable
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Minimum share of in-range parameters (percent) for a `Good` verdict
pub const GOOD_THRESHOLD_PERCENT: f64 = 80.0;

/// Minimum share of in-range parameters (percent) for a `Moderate` verdict
pub const MODERATE_THRESHOLD_PERCENT: f64 = 50.0;

/// Acceptable bounds for one parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IdealRange {
    /// Inclusive on both ends
    Between(f64, f64),
    /// Strictly greater
    Above(f64),
    /// Strictly less
    Below(f64),
}

impl IdealRange {
    pub fn contains(self, value: f64) -> bool {
        match self {
            IdealRange::Between(low, high) => value >= low && value <= high,
            IdealRange::Above(bound) => value > bound,
            IdealRange::Below(bound) => value < bound,
        }
    }
}

/// Parameters scored by the overall verdict, with their ideal ranges
pub const QUALITY_CRITERIA: [(Parameter, IdealRange); 6] = [
    (Parameter::Ph, IdealRange::Between(6.5, 8.5)),
    (Parameter::DissolvedOxygen, IdealRange::Above(6.0)),
    (Parameter::Bod, IdealRange::Below(3.0)),
    (Parameter::Cod, IdealRange::Below(10.0)),
    (Parameter::Turbidity, IdealRange::Below(5.0)),
    (Parameter::TotalColiform, IdealRange::Below(50.0)),
];

fn by_threshold(change: f64, up: TrendDirection, down: TrendDirection) -> TrendDirection {
    if change > TREND_THRESHOLD_PERCENT {
        up
    } else if change < -TREND_THRESHOLD_PERCENT {
        down
    } else {
        TrendDirection::Stable
    }
}

/// Classify a first-to-last change according to the parameter's polarity
pub fn classify_change(polarity: Polarity, first: f64, last: f64) -> TrendDirection {
    let change = percent_change(first, last);
    match polarity {
        Polarity::HigherIsBetter => {
            by_threshold(change, TrendDirection::Improving, TrendDirection::Degrading)
        }
        Polarity::LowerIsBetter => {
            by_threshold(change, TrendDirection::Degrading, TrendDirection::Improving)
        }
        Polarity::Target(target) => {
            let first_diff = (first - target).abs();
            let last_diff = (last - target).abs();
            if last_diff < first_diff {
                TrendDirection::Improving
            } else if last_diff > first_diff {
                TrendDirection::Degrading
            } else {
                TrendDirection::Stable
            }
        }
        Polarity::Neutral => {
            by_threshold(change, TrendDirection::Increasing, TrendDirection::Decreasing)
        }
    }
}

/// `(last - first) / |first| * 100`
///
/// A zero first value yields an infinite or NaN change, which classifies
/// as a directional move or as stable respectively.
pub fn percent_change(first: f64, last: f64) -> f64 {
    (last - first) / first.abs() * 100.0
}

/// Trend of one parameter over chronologically ordered readings
///
/// `None` when fewer than two readings carry a value for it.
pub fn parameter_trend(
    readings: &[WaterQualityReading],
    parameter: Parameter,
) -> Option<ParameterTrend> {
    let values: Accumulator = readings
        .iter()
        .filter_map(|r| r.parameters.get(parameter))
        .filter(|v| !v.is_nan())
        .collect();

    if values.count() < 2 {
        return None;
    }

    let (first, last) = (values.first()?, values.last()?);
    Some(ParameterTrend {
        parameter: parameter.label().to_string(),
        unit: parameter.unit().to_string(),
        trend: classify_change(parameter.polarity(), first, last),
        change_percentage: percent_change(first, last),
        latest_value: last,
        average_value: values.average()?,
    })
}

/// Trends for every tracked parameter with at least two values
///
/// Readings must already be in chronological order.
pub fn compute_water_quality_trends(readings: &[WaterQualityReading]) -> Vec<ParameterTrend> {
    if readings.len() < 2 {
        return Vec::new();
    }

    TRACKED_PARAMETERS
        .iter()
        .filter_map(|p| parameter_trend(readings, *p))
        .collect()
}

/// How many scored parameters a reading has and how many are in range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    pub score: u32,
    pub factors: u32,
}

impl QualityScore {
    /// In-range share in percent; `0.0` when nothing was scored
    pub fn percentage(&self) -> f64 {
        if self.factors == 0 {
            return 0.0;
        }
        self.score as f64 / self.factors as f64 * 100.0
    }

    /// True when the reading had none of the scored parameters. Such a
    /// reading still maps to `Poor`; check this to tell it apart from a
    /// measured poor reading.
    pub fn is_unscored(&self) -> bool {
        self.factors == 0
    }

    pub fn verdict(&self) -> QualityVerdict {
        let percentage = self.percentage();
        if percentage >= GOOD_THRESHOLD_PERCENT {
            QualityVerdict::Good
        } else if percentage >= MODERATE_THRESHOLD_PERCENT {
            QualityVerdict::Moderate
        } else {
            QualityVerdict::Poor
        }
    }
}

/// Score a reading against the ideal ranges
pub fn score_reading(reading: &WaterQualityReading) -> QualityScore {
    QUALITY_CRITERIA
        .iter()
        .filter_map(|(parameter, range)| {
            reading
                .parameters
                .get(*parameter)
                .map(|value| range.contains(value))
        })
        .fold(QualityScore::default(), |mut acc, in_range| {
            acc.factors += 1;
            if in_range {
                acc.score += 1;
            }
            acc
        })
}

/// Overall verdict for a single reading; `Unknown` when there is none
pub fn determine_overall_quality(reading: Option<&WaterQualityReading>) -> QualityVerdict {
    match reading {
        Some(reading) => score_reading(reading).verdict(),
        None => QualityVerdict::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterValues;

    fn reading(date: &str, values: &[(Parameter, f64)]) -> WaterQualityReading {
        WaterQualityReading {
            date: date.into(),
            lake_name: "Hussain Sagar".into(),
            station_name: Some("Hussain Sagar Lake".into()),
            station_code: Some("HS-01".into()),
            parameters: values.iter().copied().collect::<ParameterValues>(),
        }
    }

    fn series(parameter: Parameter, values: &[f64]) -> Vec<WaterQualityReading> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let date = format!("{} 2020", crate::dates::MONTH_NAMES[i]);
                reading(&date, &[(parameter, *v)])
            })
            .collect()
    }

    fn trend_of(readings: &[WaterQualityReading], label: &str) -> Option<ParameterTrend> {
        compute_water_quality_trends(readings)
            .into_iter()
            .find(|t| t.parameter == label)
    }

    #[test]
    fn test_dissolved_oxygen_improving_and_degrading() {
        let readings = series(Parameter::DissolvedOxygen, &[5.0, 7.0]);
        let up = trend_of(&readings, "Dissolved Oxygen").unwrap();
        assert_eq!(up.trend, TrendDirection::Improving);
        assert!((up.change_percentage - 40.0).abs() < 1e-9);
        assert_eq!(up.latest_value, 7.0);
        assert_eq!(up.average_value, 6.0);
        assert_eq!(up.unit, "mg/L");

        let readings = series(Parameter::DissolvedOxygen, &[7.0, 5.0]);
        let down = trend_of(&readings, "Dissolved Oxygen").unwrap();
        assert_eq!(down.trend, TrendDirection::Degrading);
    }

    #[test]
    fn test_bod_increase_is_degrading() {
        let trend = trend_of(&series(Parameter::Bod, &[2.0, 4.0]), "BOD").unwrap();
        assert_eq!(trend.trend, TrendDirection::Degrading);
        assert!((trend.change_percentage - 100.0).abs() < 1e-9);

        let readings = series(Parameter::TotalColiform, &[900.0, 300.0]);
        let trend = trend_of(&readings, "Total Coliform").unwrap();
        assert_eq!(trend.trend, TrendDirection::Improving);
    }

    #[test]
    fn test_ph_judged_by_distance_from_ideal() {
        let trend = trend_of(&series(Parameter::Ph, &[6.0, 7.4]), "pH Level").unwrap();
        assert_eq!(trend.trend, TrendDirection::Improving);

        let trend = trend_of(&series(Parameter::Ph, &[7.4, 9.0]), "pH Level").unwrap();
        assert_eq!(trend.trend, TrendDirection::Degrading);

        // 7.0 and 8.0 are equally far from 7.5
        let trend = trend_of(&series(Parameter::Ph, &[7.0, 8.0]), "pH Level").unwrap();
        assert_eq!(trend.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_neutral_parameter() {
        let readings = series(Parameter::Temperature, &[20.0, 25.0]);
        let trend = trend_of(&readings, "Temperature").unwrap();
        assert_eq!(trend.trend, TrendDirection::Increasing);

        let readings = series(Parameter::Temperature, &[25.0, 20.0]);
        let trend = trend_of(&readings, "Temperature").unwrap();
        assert_eq!(trend.trend, TrendDirection::Decreasing);

        let readings = series(Parameter::Temperature, &[25.0, 26.0]);
        let trend = trend_of(&readings, "Temperature").unwrap();
        assert_eq!(trend.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_change_within_threshold_is_stable() {
        let trend = trend_of(&series(Parameter::Cod, &[100.0, 104.0]), "COD").unwrap();
        assert_eq!(trend.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_uses_first_last_but_averages_all() {
        let readings = vec![
            reading("January 2020", &[(Parameter::Bod, 2.0)]),
            reading("February 2020", &[(Parameter::Ph, 7.0)]),
            reading("March 2020", &[(Parameter::Bod, 9.0)]),
            reading("April 2020", &[(Parameter::Bod, 1.0)]),
        ];

        let trend = trend_of(&readings, "BOD").unwrap();
        assert!((trend.change_percentage - -50.0).abs() < 1e-9);
        assert_eq!(trend.trend, TrendDirection::Improving);
        assert_eq!(trend.latest_value, 1.0);
        assert_eq!(trend.average_value, 4.0);
    }

    #[test]
    fn test_single_value_parameter_excluded() {
        let readings = vec![
            reading("January 2020", &[(Parameter::Bod, 2.0), (Parameter::Ph, 7.0)]),
            reading("February 2020", &[(Parameter::Bod, 3.0)]),
        ];

        let trends = compute_water_quality_trends(&readings);
        assert_eq!(trends.len(), 1);
        assert_eq!(trends[0].parameter, "BOD");
    }

    #[test]
    fn test_fewer_than_two_readings() {
        assert!(compute_water_quality_trends(&[]).is_empty());
        let one = vec![reading("January 2020", &[(Parameter::Bod, 2.0)])];
        assert!(compute_water_quality_trends(&one).is_empty());
    }

    #[test]
    fn test_trends_follow_tracked_order() {
        let readings = vec![
            reading(
                "January 2020",
                &[(Parameter::TotalColiform, 10.0), (Parameter::Ph, 7.0), (Parameter::Iron, 1.0)],
            ),
            reading(
                "February 2020",
                &[(Parameter::TotalColiform, 20.0), (Parameter::Ph, 7.2), (Parameter::Iron, 2.0)],
            ),
        ];

        let labels: Vec<_> = compute_water_quality_trends(&readings)
            .into_iter()
            .map(|t| t.parameter)
            .collect();
        assert_eq!(labels, vec!["pH Level", "Total Coliform"]);
    }

    #[test]
    fn test_zero_first_value() {
        let trend = trend_of(&series(Parameter::Turbidity, &[0.0, 2.0]), "Turbidity").unwrap();
        assert!(trend.change_percentage.is_infinite());
        assert_eq!(trend.trend, TrendDirection::Degrading);

        let trend = trend_of(&series(Parameter::Turbidity, &[0.0, 0.0]), "Turbidity").unwrap();
        assert!(trend.change_percentage.is_nan());
        assert_eq!(trend.trend, TrendDirection::Stable);
    }

    fn all_ideal() -> Vec<(Parameter, f64)> {
        vec![
            (Parameter::Ph, 7.0),
            (Parameter::DissolvedOxygen, 7.0),
            (Parameter::Bod, 2.0),
            (Parameter::Cod, 5.0),
            (Parameter::Turbidity, 3.0),
            (Parameter::TotalColiform, 20.0),
        ]
    }

    #[test]
    fn test_verdict_all_ideal() {
        let r = reading("May 2021", &all_ideal());
        assert_eq!(score_reading(&r), QualityScore { score: 6, factors: 6 });
        assert_eq!(determine_overall_quality(Some(&r)), QualityVerdict::Good);
    }

    #[test]
    fn test_verdict_one_out_of_range() {
        let mut values = all_ideal();
        values[5] = (Parameter::TotalColiform, 100.0);
        let r = reading("May 2021", &values);
        assert_eq!(score_reading(&r), QualityScore { score: 5, factors: 6 });
        assert_eq!(determine_overall_quality(Some(&r)), QualityVerdict::Good);
    }

    #[test]
    fn test_verdict_two_out_of_range() {
        let mut values = all_ideal();
        values[5] = (Parameter::TotalColiform, 100.0);
        values[2] = (Parameter::Bod, 3.0);
        let r = reading("May 2021", &values);
        assert_eq!(score_reading(&r), QualityScore { score: 4, factors: 6 });
        assert_eq!(determine_overall_quality(Some(&r)), QualityVerdict::Moderate);
    }

    #[test]
    fn test_verdict_poor() {
        let r = reading(
            "May 2021",
            &[(Parameter::Ph, 9.1), (Parameter::Bod, 12.0), (Parameter::Cod, 4.0)],
        );
        assert_eq!(determine_overall_quality(Some(&r)), QualityVerdict::Poor);
    }

    #[test]
    fn test_verdict_absent_reading_is_unknown() {
        assert_eq!(determine_overall_quality(None), QualityVerdict::Unknown);
    }

    #[test]
    fn test_verdict_unscored_reading() {
        let r = reading("May 2021", &[(Parameter::Iron, 0.3)]);
        let score = score_reading(&r);
        assert!(score.is_unscored());
        assert_eq!(score.percentage(), 0.0);
        assert_eq!(determine_overall_quality(Some(&r)), QualityVerdict::Poor);
    }

    #[test]
    fn test_ideal_range_bounds() {
        assert!(IdealRange::Between(6.5, 8.5).contains(6.5));
        assert!(IdealRange::Between(6.5, 8.5).contains(8.5));
        assert!(!IdealRange::Above(6.0).contains(6.0));
        assert!(!IdealRange::Below(3.0).contains(3.0));
    }
}
