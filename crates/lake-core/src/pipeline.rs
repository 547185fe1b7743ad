//! Collaborator seams: where raw records come from

use anyhow::Result;
use std::collections::BTreeMap;

use crate::{RawAreaRecord, WaterQualityReading};

/// Raw surface-area records for one water body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LakeAreaRecords {
    /// Display name reported by the source, if any
    pub lake_name: Option<String>,
    pub records: Vec<RawAreaRecord>,
}

/// Water-quality readings grouped by lake id, each list in chronological order
pub type ReadingsByLake = BTreeMap<String, Vec<WaterQualityReading>>;

#[async_trait::async_trait]
pub trait AreaRecordSource: Send + Sync {
    /// Records for a satellite water-body id; `None` when the source
    /// holds nothing for it
    async fn area_records(&self, bhuvan_id: &str) -> Result<Option<LakeAreaRecords>>;
}

#[async_trait::async_trait]
pub trait ReadingSource: Send + Sync {
    async fn readings_by_lake(&self) -> Result<ReadingsByLake>;
}
