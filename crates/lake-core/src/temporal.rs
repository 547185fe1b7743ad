//! Temporal aggregation of satellite surface-area records

use crate::dates::parse_observation_timestamp;
use crate::rollups::{monthly_aggregates, yearly_aggregates, Accumulator};
use crate::types::{
    AreaRange, DateRange, Observation, RawAreaRecord, SeasonalPatterns, TemporalResult,
    TemporalStatistics, TrendDirection, YearlyAggregate,
};
use chrono::{Datelike, NaiveDateTime};

/// First-to-last year change (percent) beyond which the area trend is
/// no longer stable
pub const AREA_TREND_THRESHOLD_PERCENT: f64 = 10.0;

/// Calendar-month seasonal bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// June through October
    Monsoon,
    /// November through February
    Winter,
    /// March through May
    Summer,
}

impl Season {
    pub fn of_month(month: u32) -> Self {
        match month {
            6..=10 => Season::Monsoon,
            3..=5 => Season::Summer,
            _ => Season::Winter,
        }
    }
}

/// Keep records with a positive area and a parseable date, ascending by
/// acquisition time. Records sharing a timestamp keep their source order.
pub fn observations_from_records(records: &[RawAreaRecord]) -> Vec<Observation> {
    let mut timed: Vec<(NaiveDateTime, Observation)> = records
        .iter()
        .filter_map(|record| {
            let area = record.area.filter(|a| *a > 0.0)?;
            let acquired = parse_observation_timestamp(record.timestamp.as_deref()?)?;
            let observation = Observation {
                date: acquired.date(),
                area,
                sensor: record.sensor.clone().unwrap_or_default(),
                cloud_cover: record.cloud_cover,
                confidence: record.confidence,
            };
            Some((acquired, observation))
        })
        .collect();

    timed.sort_by_key(|(acquired, _)| *acquired);
    timed.into_iter().map(|(_, o)| o).collect()
}

/// Label a first-to-last year percentage change
pub fn classify_area_change(change: f64) -> TrendDirection {
    if change > AREA_TREND_THRESHOLD_PERCENT {
        TrendDirection::Increasing
    } else if change < -AREA_TREND_THRESHOLD_PERCENT {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

fn seasonal_patterns(observations: &[Observation]) -> SeasonalPatterns {
    let mut monsoon = Accumulator::new();
    let mut winter = Accumulator::new();
    let mut summer = Accumulator::new();

    for observation in observations {
        match Season::of_month(observation.date.month()) {
            Season::Monsoon => monsoon.add(observation.area),
            Season::Winter => winter.add(observation.area),
            Season::Summer => summer.add(observation.area),
        }
    }

    SeasonalPatterns {
        monsoon_average: monsoon.average().unwrap_or(0.0),
        winter_average: winter.average().unwrap_or(0.0),
        summer_average: summer.average().unwrap_or(0.0),
        monsoon_data_points: monsoon.count(),
        winter_data_points: winter.count(),
        summer_data_points: summer.count(),
    }
}

/// Summary statistics over date-sorted observations
///
/// Returns `None` when there are no observations.
pub fn temporal_statistics(
    observations: &[Observation],
    yearly: &[YearlyAggregate],
) -> Option<TemporalStatistics> {
    let (first, last) = (observations.first()?, observations.last()?);
    let areas: Accumulator = observations.iter().map(|o| o.area).collect();
    let overall = areas.rollup()?;

    let percentage_change = match (yearly.first(), yearly.last()) {
        (Some(first_year), Some(last_year)) => {
            (last_year.average_area - first_year.average_area) / first_year.average_area * 100.0
        }
        _ => 0.0,
    };

    Some(TemporalStatistics {
        total_data_points: overall.count,
        date_range: DateRange {
            start: first.date,
            end: last.date,
        },
        area_range: AreaRange {
            min: overall.min,
            max: overall.max,
            average: overall.average,
        },
        trend: classify_area_change(percentage_change),
        percentage_change,
        seasonal_patterns: seasonal_patterns(observations),
    })
}

/// Turn one lake's raw records into daily, monthly and yearly series
/// plus summary statistics
pub fn aggregate_temporal(records: &[RawAreaRecord], lake_name: &str) -> TemporalResult {
    let daily_data = observations_from_records(records);
    let monthly_data = monthly_aggregates(&daily_data);
    let yearly_data = yearly_aggregates(&daily_data);
    let statistics = temporal_statistics(&daily_data, &yearly_data);

    TemporalResult {
        lake_name: lake_name.to_string(),
        daily_data,
        monthly_data,
        yearly_data,
        statistics,
    }
}
