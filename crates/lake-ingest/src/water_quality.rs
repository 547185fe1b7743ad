//! Laboratory water-quality CSV
//!
//! One file holds samples for many lakes. Rows are mapped to lake ids via
//! the catalog, parameter columns are looked up by any of their known
//! header spellings, and each lake's readings are sorted by date.

use crate::{IngestError, IngestResult, LakeCatalog};
use lake_core::{
    parse_reading_date, sort_readings, Parameter, ParameterValues, ReadingSource, ReadingsByLake,
    WaterQualityReading,
};
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

const LAKE_NAME_COLUMN: &str = "Lake_Name_Standardized";
const DATE_COLUMN: &str = "Date";
const STATION_NAME_COLUMN: &str = "Station name";
const STATION_CODE_COLUMN: &str = "Station code";

/// Header spellings per parameter, tried in order
const PARAMETER_COLUMNS: [(Parameter, &[&str]); 41] = [
    (Parameter::Temperature, &["Water Temp. (OC)"]),
    (Parameter::Turbidity, &["Turbidity (NTU)"]),
    (
        Parameter::Conductivity,
        &["Conductivity (mS/cm)", "Conductivity (μs/cm)"],
    ),
    (Parameter::Tds, &["TDS (mg/L)"]),
    (Parameter::Tss, &["TSS (mg/L)"]),
    (Parameter::Ph, &["pH"]),
    (Parameter::DissolvedOxygen, &["DO (mg/L)"]),
    (Parameter::Bod, &["BOD (mg/L)"]),
    (Parameter::Cod, &["COD (mg/L)", "COD (mg/L).1"]),
    (Parameter::NitrateN, &["Nitrate-N (mg/L)", "Nitrate"]),
    (Parameter::NitriteN, &["Nitrite-N (mg/L)"]),
    (
        Parameter::AmmoniaN,
        &["Ammonia-N (mg/L)", "Ammonia-N  (mg/L)"],
    ),
    (
        Parameter::Phosphate,
        &["Phosphate (mg/L)", "Total Phosphate (mg/L)"],
    ),
    (Parameter::Tkn, &["TKN (mg/L)"]),
    (Parameter::Chloride, &["Chloride (mg/L)"]),
    (Parameter::Sulphate, &["Sulphate (mg/L)"]),
    (Parameter::Sodium, &["Sodium (mg/L)"]),
    (
        Parameter::Calcium,
        &["Calcium (mg/L)", "Calcium as Ca+2(mg/L)"],
    ),
    (
        Parameter::Magnesium,
        &["Magnesium (mg/L)", "Magnesium as Mg+2(mg/L)"],
    ),
    (Parameter::Potassium, &["Potassium (mg/L)"]),
    (Parameter::Fluoride, &["Fluoride (mg/L)"]),
    (Parameter::Boron, &["Boron (mg/L)"]),
    (
        Parameter::Hardness,
        &[
            "Hardness (mg/L)",
            "Total Hardness as CaCO3(mg/L)",
            "Total Hardness as CaCO3 (mg/L)",
        ],
    ),
    (Parameter::TotalAlkalinity, &["Total Alk. (mg/L)"]),
    (Parameter::PhenolphthaleinAlkalinity, &["Phen-Alk. (mg/L)"]),
    (
        Parameter::FecalColiform,
        &["Fecal Coliform (MPN/100ml)", "Faecal Coliform (MPN/100ml)"],
    ),
    (
        Parameter::TotalColiform,
        &["Total Coliform (MPN/100ml)", "Total coliform (MPN/100ml)"],
    ),
    (
        Parameter::FecalStreptococci,
        &["Fecal streptococci", "Faecal streptococci"],
    ),
    (Parameter::Arsenic, &["Arsenic"]),
    (Parameter::Cadmium, &["Cadmium", "Cadmium (Cd)"]),
    (Parameter::Copper, &["Copper", "Copper (Cu)"]),
    (Parameter::Lead, &["Lead", "Lead (Pb)"]),
    (
        Parameter::Chromium,
        &["Total Chromium", "Total Chromium (T. Cr)"],
    ),
    (Parameter::Nickel, &["Nickel", "Nickel (Ni)"]),
    (Parameter::Zinc, &["Zinc", "Zinc (Zn)"]),
    (Parameter::Iron, &["Iron", "Iron (Fe)"]),
    (Parameter::SaprobityIndex, &["Saprobity index"]),
    (Parameter::DiversityIndex, &["Diversity index"]),
    (
        Parameter::SodiumPercentage,
        &["Sodium %", "sodium %", "% Sodium"],
    ),
    (Parameter::Sar, &["SAR"]),
    (Parameter::PrRatio, &["P/R Ratio"]),
];

/// Parse the leading numeric part of a cell, e.g. `"7.4"` or `"12.5*"`.
/// Empty, non-numeric and non-finite cells are absent. Zero is a value.
pub fn parse_measurement(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<f64>() {
        return Some(v).filter(|v| v.is_finite());
    }
    (1..cell.len())
        .rev()
        .filter(|end| cell.is_char_boundary(*end))
        .find_map(|end| cell[..end].trim_end().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Resolved column positions for one header row
struct ColumnIndex {
    lake_name: usize,
    date: Option<usize>,
    station_name: Option<usize>,
    station_code: Option<usize>,
    parameters: Vec<(Parameter, Vec<usize>)>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> IngestResult<Self> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            positions.entry(header.trim()).or_insert(i);
        }

        let lake_name = *positions
            .get(LAKE_NAME_COLUMN)
            .ok_or_else(|| IngestError::MissingColumn(LAKE_NAME_COLUMN.to_string()))?;

        let parameters = PARAMETER_COLUMNS
            .iter()
            .map(|(parameter, names)| {
                let columns = names
                    .iter()
                    .filter_map(|name| positions.get(name).copied())
                    .collect();
                (*parameter, columns)
            })
            .collect();

        Ok(Self {
            lake_name,
            date: positions.get(DATE_COLUMN).copied(),
            station_name: positions.get(STATION_NAME_COLUMN).copied(),
            station_code: positions.get(STATION_CODE_COLUMN).copied(),
            parameters,
        })
    }
}

fn text(record: &csv::StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parameter_values(record: &csv::StringRecord, index: &ColumnIndex) -> ParameterValues {
    index
        .parameters
        .iter()
        .filter_map(|(parameter, columns)| {
            columns
                .iter()
                .filter_map(|i| record.get(*i))
                .find_map(parse_measurement)
                .map(|value| (*parameter, value))
        })
        .collect()
}

/// Parse the CSV into per-lake readings, each sorted by date
///
/// Rows with no lake name, an unknown lake name, or a read error are
/// skipped; the remaining rows are still returned.
pub fn parse_readings<R: Read>(reader: R, catalog: &LakeCatalog) -> IngestResult<ReadingsByLake> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let index = ColumnIndex::from_headers(csv_reader.headers()?)?;

    let mut by_lake = ReadingsByLake::new();
    let mut unmapped: BTreeSet<String> = BTreeSet::new();
    let mut skipped = 0usize;

    for (row, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(row, error = %e, "skipping unreadable CSV row");
                skipped += 1;
                continue;
            }
        };

        let Some(lake_name) = text(&record, Some(index.lake_name)) else {
            skipped += 1;
            continue;
        };
        let Some(lake_id) = catalog.lake_id(&lake_name) else {
            unmapped.insert(lake_name);
            skipped += 1;
            continue;
        };

        let reading = WaterQualityReading {
            date: text(&record, index.date).unwrap_or_default(),
            lake_name,
            station_name: text(&record, index.station_name),
            station_code: text(&record, index.station_code),
            parameters: parameter_values(&record, &index),
        };
        by_lake.entry(lake_id.to_string()).or_default().push(reading);
    }

    for (lake_id, readings) in by_lake.iter_mut() {
        sort_readings(readings);
        let undated = readings
            .iter()
            .filter(|r| parse_reading_date(&r.date).is_none())
            .count();
        if undated > 0 {
            warn!(
                lake_id = %lake_id,
                "{} readings have unparseable dates and sort as the epoch", undated
            );
        }
    }

    if !unmapped.is_empty() {
        debug!(names = ?unmapped, "lake names without a catalog entry");
    }
    info!(
        "Parsed water-quality readings for {} lakes ({} rows skipped)",
        by_lake.len(),
        skipped
    );
    Ok(by_lake)
}

/// Water-quality CSV on disk, re-read on every request
#[derive(Debug, Clone)]
pub struct WaterQualityCsv {
    path: PathBuf,
    catalog: Arc<LakeCatalog>,
}

impl WaterQualityCsv {
    pub fn new<P: AsRef<Path>>(path: P, catalog: Arc<LakeCatalog>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            catalog,
        }
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> IngestResult<ReadingsByLake> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| IngestError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_readings(bytes.as_slice(), &self.catalog)
    }
}

#[async_trait::async_trait]
impl ReadingSource for WaterQualityCsv {
    async fn readings_by_lake(&self) -> anyhow::Result<ReadingsByLake> {
        Ok(self.load().await?)
    }
}
