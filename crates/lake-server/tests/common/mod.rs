#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use lake_core::{
    AreaRecordSource, LakeAreaRecords, Parameter, ParameterValues, RawAreaRecord, ReadingSource,
    ReadingsByLake, WaterQualityReading,
};
use lake_ingest::LakeCatalog;
use lake_server::Sources;
use tower::ServiceExt;

/// Area records keyed by Bhuvan id
#[derive(Default)]
pub struct MemoryAreas(pub BTreeMap<String, LakeAreaRecords>);

#[async_trait::async_trait]
impl AreaRecordSource for MemoryAreas {
    async fn area_records(&self, bhuvan_id: &str) -> Result<Option<LakeAreaRecords>> {
        Ok(self.0.get(bhuvan_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryReadings(pub ReadingsByLake);

#[async_trait::async_trait]
impl ReadingSource for MemoryReadings {
    async fn readings_by_lake(&self) -> Result<ReadingsByLake> {
        Ok(self.0.clone())
    }
}

/// Source that always fails, standing in for an unreadable file
pub struct Broken;

#[async_trait::async_trait]
impl AreaRecordSource for Broken {
    async fn area_records(&self, _bhuvan_id: &str) -> Result<Option<LakeAreaRecords>> {
        bail!("disk on fire")
    }
}

#[async_trait::async_trait]
impl ReadingSource for Broken {
    async fn readings_by_lake(&self) -> Result<ReadingsByLake> {
        bail!("disk on fire")
    }
}

pub fn sources(
    area_source: Arc<dyn AreaRecordSource>,
    reading_source: Arc<dyn ReadingSource>,
) -> Sources {
    Sources {
        catalog: Arc::new(LakeCatalog::builtin()),
        area_source,
        reading_source,
        boundary_years: 1984..=2024,
    }
}

pub fn empty_app() -> (Router, Arc<lake_server::AppState>) {
    lake_server::build_app(sources(
        Arc::new(MemoryAreas::default()),
        Arc::new(MemoryReadings::default()),
    ))
    .unwrap()
}

pub fn reading(date: &str, lake_name: &str, values: &[(Parameter, f64)]) -> WaterQualityReading {
    WaterQualityReading {
        date: date.into(),
        lake_name: lake_name.into(),
        station_name: Some(lake_name.into()),
        station_code: None,
        parameters: values.iter().copied().collect::<ParameterValues>(),
    }
}

pub fn area(date: &str, hectares: f64) -> RawAreaRecord {
    RawAreaRecord {
        timestamp: Some(date.into()),
        area: Some(hectares),
        sensor: Some("L8".into()),
        cloud_cover: Some(0.0),
        confidence: Some(95.0),
    }
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, body) = get(app, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}
