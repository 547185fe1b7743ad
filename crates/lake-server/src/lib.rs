use std::ops::RangeInclusive;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, SecondsFormat, Utc};
use lake_core::{
    aggregate_temporal, compute_water_quality_trends, determine_overall_quality, score_reading,
    AreaRecordSource, ParameterTrend, QualityScore, QualityVerdict, ReadingSource, TemporalResult,
    WaterQualityReading,
};
use lake_ingest::LakeCatalog;
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry::KeyValue;
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;

const TEMPORAL_SOURCE: &str = "ISRO Bhuvan WBIS";
const BOUNDARY_NOTE: &str = "Fetch this URL from the client to get boundary data";

/// Everything the handlers read from, wired once at startup
pub struct Sources {
    pub catalog: Arc<LakeCatalog>,
    pub area_source: Arc<dyn AreaRecordSource>,
    pub reading_source: Arc<dyn ReadingSource>,
    /// Years with a published lake boundary file
    pub boundary_years: RangeInclusive<i32>,
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    not_found_total: Counter<u64>,
    catalog: Arc<LakeCatalog>,
    area_source: Arc<dyn AreaRecordSource>,
    reading_source: Arc<dyn ReadingSource>,
    boundary_years: RangeInclusive<i32>,
}

pub fn build_app(sources: Sources) -> Result<(Router, Arc<AppState>)> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter().with_registry(registry.clone()).build()?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("lakewatch");

    let requests_total = meter
        .u64_counter("lakewatch_requests_total")
        .with_description("Total HTTP requests served")
        .init();
    let not_found_total = meter
        .u64_counter("lakewatch_not_found_total")
        .with_description("Lake lookups that found no data")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        not_found_total,
        catalog: sources.catalog,
        area_source: sources.area_source,
        reading_source: sources.reading_source,
        boundary_years: sources.boundary_years,
    });

    let router = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/lakes/:id/water-quality", get(water_quality))
        .route("/api/lakes/:id/temporal-data", get(temporal_data))
        // Browser clients are served from another origin
        .layer(CorsLayer::permissive())
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

fn count_request(state: &AppState, route: &'static str) {
    state
        .requests_total
        .add(1, &[KeyValue::new("route", route)]);
}

fn not_found(state: &AppState, route: &'static str, error: &str, lake_id: &str) -> Response {
    state
        .not_found_total
        .add(1, &[KeyValue::new("route", route)]);
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": error, "lakeId": lake_id })),
    )
        .into_response()
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    count_request(&state, "health");
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    count_request(&state, "healthz");
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WaterQualityResponse<'a> {
    lake_id: &'a str,
    lake_name: &'a str,
    readings: &'a [WaterQualityReading],
    latest_reading: &'a WaterQualityReading,
    overall_quality: QualityVerdict,
    /// In-range vs scored parameters behind `overall_quality`
    quality_score: QualityScore,
    trends: Vec<ParameterTrend>,
}

#[tracing::instrument(skip(state))]
async fn water_quality(
    State(state): State<Arc<AppState>>,
    Path(lake_id): Path<String>,
) -> Response {
    count_request(&state, "water-quality");

    let mut by_lake = match state.reading_source.readings_by_lake().await {
        Ok(by_lake) => by_lake,
        Err(e) => {
            tracing::error!(error=?e, "failed to load water quality data");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch water quality data" })),
            )
                .into_response();
        }
    };

    let readings = by_lake.remove(&lake_id).unwrap_or_default();
    let Some(latest_reading) = readings.last() else {
        return not_found(
            &state,
            "water-quality",
            "No water quality data found for this lake",
            &lake_id,
        );
    };

    let quality_score = score_reading(latest_reading);
    if quality_score.is_unscored() {
        tracing::debug!("latest reading has no scored parameters");
    }

    let response = WaterQualityResponse {
        lake_id: &lake_id,
        lake_name: &latest_reading.lake_name,
        readings: &readings,
        latest_reading,
        overall_quality: determine_overall_quality(Some(latest_reading)),
        quality_score,
        trends: compute_water_quality_trends(&readings),
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemporalData {
    lake_id: String,
    source: &'static str,
    #[serde(flatten)]
    result: TemporalResult,
}

#[derive(Debug, Serialize, PartialEq)]
struct HistoricalBoundary {
    year: i32,
    url: String,
    note: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
struct YearRange {
    start: Option<i32>,
    end: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataAvailable {
    has_daily_data: bool,
    has_historical_boundaries: bool,
    year_range: YearRange,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemporalDataResponse {
    lake_id: String,
    temporal_data: Option<TemporalData>,
    historical_boundaries: Vec<HistoricalBoundary>,
    data_available: DataAvailable,
}

fn historical_boundaries(years: RangeInclusive<i32>) -> Vec<HistoricalBoundary> {
    years
        .map(|year| HistoricalBoundary {
            year,
            url: format!("/data/lakes/lakes_{year}.geojson"),
            note: BOUNDARY_NOTE,
        })
        .collect()
}

/// Observed years when statistics exist, else the boundary years
fn year_range(temporal: Option<&TemporalData>, boundaries: &[HistoricalBoundary]) -> YearRange {
    match temporal.and_then(|t| t.result.statistics.as_ref()) {
        Some(stats) => YearRange {
            start: Some(stats.date_range.start.year()),
            end: Some(stats.date_range.end.year()),
        },
        None => YearRange {
            start: boundaries.first().map(|b| b.year),
            end: boundaries.last().map(|b| b.year),
        },
    }
}

#[tracing::instrument(skip(state))]
async fn temporal_data(
    State(state): State<Arc<AppState>>,
    Path(lake_id): Path<String>,
) -> Response {
    count_request(&state, "temporal-data");

    let Some(bhuvan_id) = state.catalog.bhuvan_id(&lake_id) else {
        tracing::info!("no Bhuvan id mapped");
        return not_found(
            &state,
            "temporal-data",
            "No temporal data found for this lake",
            &lake_id,
        );
    };

    let temporal_data = match state.area_source.area_records(bhuvan_id).await {
        Ok(Some(lake)) => {
            let lake_name = lake.lake_name.unwrap_or_else(|| lake_id.clone());
            Some(TemporalData {
                lake_id: lake_id.clone(),
                source: TEMPORAL_SOURCE,
                result: aggregate_temporal(&lake.records, &lake_name),
            })
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error=?e, %bhuvan_id, "failed to load temporal data");
            None
        }
    };

    let historical_boundaries = historical_boundaries(state.boundary_years.clone());
    let data_available = DataAvailable {
        has_daily_data: temporal_data
            .as_ref()
            .is_some_and(|t| !t.result.daily_data.is_empty()),
        has_historical_boundaries: !historical_boundaries.is_empty(),
        year_range: year_range(temporal_data.as_ref(), &historical_boundaries),
    };

    let response = TemporalDataResponse {
        lake_id,
        temporal_data,
        historical_boundaries,
        data_available,
    };
    (StatusCode::OK, Json(response)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lake_core::{DateRange, TemporalStatistics};

    #[test]
    fn boundaries_cover_every_year() {
        let boundaries = historical_boundaries(1984..=2024);
        assert_eq!(boundaries.len(), 41);
        assert_eq!(boundaries[0].url, "/data/lakes/lakes_1984.geojson");
        assert_eq!(boundaries[40].year, 2024);
    }

    #[test]
    fn year_range_falls_back_to_boundaries() {
        let boundaries = historical_boundaries(2000..=2003);
        assert_eq!(
            year_range(None, &boundaries),
            YearRange {
                start: Some(2000),
                end: Some(2003)
            }
        );
        assert_eq!(
            year_range(None, &[]),
            YearRange {
                start: None,
                end: None
            }
        );
    }

    #[test]
    fn year_range_prefers_observed_dates() {
        let mut result = aggregate_temporal(&[], "Lake");
        let day = |y| NaiveDate::from_ymd_opt(y, 3, 1).unwrap();
        result.statistics = Some(TemporalStatistics {
            total_data_points: 2,
            date_range: DateRange {
                start: day(2016),
                end: day(2023),
            },
            area_range: lake_core::AreaRange {
                min: 1.0,
                max: 2.0,
                average: 1.5,
            },
            trend: lake_core::TrendDirection::Stable,
            percentage_change: 0.0,
            seasonal_patterns: Default::default(),
        });
        let temporal = TemporalData {
            lake_id: "lake".into(),
            source: TEMPORAL_SOURCE,
            result,
        };

        let range = year_range(Some(&temporal), &historical_boundaries(1984..=2024));
        assert_eq!(
            range,
            YearRange {
                start: Some(2016),
                end: Some(2023)
            }
        );
    }
}
