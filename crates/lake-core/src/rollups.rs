//! Monthly and yearly rollups of surface-area observations

use crate::types::{MonthlyAggregate, Observation, YearlyAggregate};
use chrono::Datelike;
use std::collections::BTreeMap;

/// Min/max/average/count over a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rollup {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Accumulator for calculating a rollup over multiple observations
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    observations: Vec<f64>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.observations.push(value);
    }

    pub fn min(&self) -> Option<f64> {
        if self.observations.is_empty() {
            return None;
        }
        Some(
            self.observations
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min),
        )
    }

    pub fn max(&self) -> Option<f64> {
        if self.observations.is_empty() {
            return None;
        }
        Some(
            self.observations
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max),
        )
    }

    /// Unweighted arithmetic mean
    pub fn average(&self) -> Option<f64> {
        if self.observations.is_empty() {
            return None;
        }
        let sum: f64 = self.observations.iter().sum();
        Some(sum / self.observations.len() as f64)
    }

    pub fn first(&self) -> Option<f64> {
        self.observations.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.observations.last().copied()
    }

    pub fn count(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn rollup(&self) -> Option<Rollup> {
        Some(Rollup {
            average: self.average()?,
            min: self.min()?,
            max: self.max()?,
            count: self.count(),
        })
    }
}

impl FromIterator<f64> for Accumulator {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}

/// Group observations by key and roll up their areas, ascending by key
fn rollup_by<K, F>(observations: &[Observation], key_of: F) -> Vec<(K, Rollup)>
where
    K: Ord,
    F: Fn(&Observation) -> K,
{
    let mut groups: BTreeMap<K, Accumulator> = BTreeMap::new();
    for observation in observations {
        groups
            .entry(key_of(observation))
            .or_default()
            .add(observation.area);
    }

    groups
        .into_iter()
        .filter_map(|(key, acc)| acc.rollup().map(|rollup| (key, rollup)))
        .collect()
}

/// One aggregate per (year, month) present in the observations
pub fn monthly_aggregates(observations: &[Observation]) -> Vec<MonthlyAggregate> {
    rollup_by(observations, |o| (o.date.year(), o.date.month()))
        .into_iter()
        .map(|((year, month), r)| MonthlyAggregate {
            year,
            month,
            average_area: r.average,
            min_area: r.min,
            max_area: r.max,
            data_points: r.count,
        })
        .collect()
}

/// One aggregate per year present in the observations
pub fn yearly_aggregates(observations: &[Observation]) -> Vec<YearlyAggregate> {
    rollup_by(observations, |o| o.date.year())
        .into_iter()
        .map(|(year, r)| YearlyAggregate {
            year,
            average_area: r.average,
            min_area: r.min,
            max_area: r.max,
            data_points: r.count,
        })
        .collect()
}
