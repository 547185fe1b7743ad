//! Core data types for lake observations and water-quality readings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::parameters::Parameter;

/// Raw surface-area record as delivered by the satellite data source
///
/// Every field is optional: malformed values deserialize as absent
/// instead of failing the whole record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawAreaRecord {
    /// Acquisition timestamp (date or date-time string)
    #[serde(rename = "st", default, deserialize_with = "lenient::string")]
    pub timestamp: Option<String>,

    /// Detected water surface area in hectares
    #[serde(rename = "a", default, deserialize_with = "lenient::number")]
    pub area: Option<f64>,

    /// Sensor identifier
    #[serde(rename = "s", default, deserialize_with = "lenient::string")]
    pub sensor: Option<String>,

    /// Cloud cover fraction over the water body
    #[serde(rename = "clf", default, deserialize_with = "lenient::number")]
    pub cloud_cover: Option<f64>,

    /// Classifier confidence score
    #[serde(rename = "c", default, deserialize_with = "lenient::number")]
    pub confidence: Option<f64>,
}

/// A single dated surface-area observation with a positive area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub date: NaiveDate,
    /// Hectares, always > 0
    pub area: f64,
    pub sensor: String,
    pub cloud_cover: Option<f64>,
    pub confidence: Option<f64>,
}

/// Rollup of all observations in one calendar month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAggregate {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub average_area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub data_points: usize,
}

/// Rollup of all observations in one calendar year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearlyAggregate {
    pub year: i32,
    pub average_area: f64,
    pub min_area: f64,
    pub max_area: f64,
    pub data_points: usize,
}

/// First and last observation dates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AreaRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Mean area per seasonal bucket
///
/// An empty bucket reports an average of `0.0`; its data point count
/// tells it apart from a measured zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPatterns {
    pub monsoon_average: f64,
    pub winter_average: f64,
    pub summer_average: f64,
    pub monsoon_data_points: usize,
    pub winter_data_points: usize,
    pub summer_data_points: usize,
}

/// Summary over every observation of one lake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemporalStatistics {
    pub total_data_points: usize,
    pub date_range: DateRange,
    pub area_range: AreaRange,
    pub trend: TrendDirection,
    /// First-year vs last-year average area, in percent
    pub percentage_change: f64,
    pub seasonal_patterns: SeasonalPatterns,
}

/// Output of the temporal aggregator for one lake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemporalResult {
    pub lake_name: String,
    pub daily_data: Vec<Observation>,
    pub monthly_data: Vec<MonthlyAggregate>,
    pub yearly_data: Vec<YearlyAggregate>,
    /// `None` when no observation survived filtering
    pub statistics: Option<TemporalStatistics>,
}

/// Directional classification of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Degrading,
    Stable,
    Increasing,
    Decreasing,
}

/// Measured parameter values of a single reading, keyed by parameter
///
/// A parameter missing from the map was not measured. Only finite values
/// are ever stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ParameterValues(BTreeMap<Parameter, f64>);

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value. Non-finite values are treated as not measured and
    /// leave the map untouched; returns whether the value was stored.
    pub fn insert(&mut self, parameter: Parameter, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        self.0.insert(parameter, value);
        true
    }

    pub fn get(&self, parameter: Parameter) -> Option<f64> {
        self.0.get(&parameter).copied()
    }

    pub fn contains(&self, parameter: Parameter) -> bool {
        self.0.contains_key(&parameter)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        self.0.iter().map(|(p, v)| (*p, *v))
    }
}

impl FromIterator<(Parameter, f64)> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = (Parameter, f64)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (parameter, value) in iter {
            values.insert(parameter, value);
        }
        values
    }
}

/// One laboratory sample for a lake
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaterQualityReading {
    /// Date label as recorded, e.g. "January 2018"
    pub date: String,
    pub lake_name: String,
    pub station_name: Option<String>,
    pub station_code: Option<String>,
    pub parameters: ParameterValues,
}

/// Trend of one tracked parameter across a lake's reading history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterTrend {
    pub parameter: String,
    pub unit: String,
    pub trend: TrendDirection,
    pub change_percentage: f64,
    pub latest_value: f64,
    pub average_value: f64,
}

/// Coarse quality judgment for a single reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityVerdict {
    Good,
    Moderate,
    Poor,
    Unknown,
}

mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Field>::deserialize(deserializer)? {
            Some(Field::Number(v)) => Some(v),
            Some(Field::Text(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite()))
    }

    pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Field>::deserialize(deserializer)? {
            Some(Field::Text(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }
}
