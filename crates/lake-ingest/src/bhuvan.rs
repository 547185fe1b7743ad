//! Bhuvan WBIS surface-area exports
//!
//! Layout: `<root>/<bhuvan_id>/metadata.json` and
//! `<root>/<bhuvan_id>/wsa_daily.json`.

use crate::{IngestError, IngestResult};
use lake_core::{AreaRecordSource, LakeAreaRecords, RawAreaRecord};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

const METADATA_FILE: &str = "metadata.json";
const DAILY_AREA_FILE: &str = "wsa_daily.json";

#[derive(Debug, Deserialize)]
struct WaterBodyMetadata {
    #[serde(rename = "Water Body Name")]
    name: Option<String>,
}

/// Directory of per-water-body Bhuvan exports
#[derive(Debug, Clone)]
pub struct BhuvanDirectory {
    root: PathBuf,
}

impl BhuvanDirectory {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load one water body; `Ok(None)` if its directory does not exist
    #[instrument(skip(self))]
    pub async fn load(&self, bhuvan_id: &str) -> IngestResult<Option<LakeAreaRecords>> {
        let dir = self.root.join(bhuvan_id);
        if !tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            warn!("Bhuvan data directory not found: {}", dir.display());
            return Ok(None);
        }

        let lake_name = self.lake_name(&dir).await;
        let records = read_daily_records(&dir.join(DAILY_AREA_FILE)).await?;
        debug!("Loaded {} raw area records", records.len());

        Ok(Some(LakeAreaRecords { lake_name, records }))
    }

    /// Display name from the metadata file; absent on any problem
    async fn lake_name(&self, dir: &Path) -> Option<String> {
        let path = dir.join(METADATA_FILE);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "metadata unavailable: {}", path.display());
                return None;
            }
        };
        match serde_json::from_slice::<Vec<WaterBodyMetadata>>(&bytes) {
            Ok(entries) => entries
                .into_iter()
                .next()
                .and_then(|m| m.name)
                .filter(|name| !name.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "invalid metadata: {}", path.display());
                None
            }
        }
    }
}

async fn read_daily_records(path: &Path) -> IngestResult<Vec<RawAreaRecord>> {
    let bytes = tokio::fs::read(path).await.map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<serde_json::Value> =
        serde_json::from_slice(&bytes).map_err(|source| IngestError::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;

    let total = entries.len();
    let records: Vec<RawAreaRecord> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect();

    if records.len() < total {
        warn!(
            "Skipped {} malformed entries in {}",
            total - records.len(),
            path.display()
        );
    }
    Ok(records)
}

#[async_trait::async_trait]
impl AreaRecordSource for BhuvanDirectory {
    async fn area_records(&self, bhuvan_id: &str) -> anyhow::Result<Option<LakeAreaRecords>> {
        Ok(self.load(bhuvan_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_lake(root: &Path, id: &str, metadata: &str, daily: &str) {
        let dir = root.join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(METADATA_FILE), metadata).unwrap();
        fs::write(dir.join(DAILY_AREA_FILE), daily).unwrap();
    }

    #[tokio::test]
    async fn loads_records_and_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_lake(
            tmp.path(),
            "1007878045612624311",
            r#"[{"Water Body Name":"Hussain Sagar","State":"Telangana"}]"#,
            r#"[
                {"st":"2020-01-05","a":410.2,"s":"L8","clf":0.0,"c":91},
                {"st":"2020-01-21","a":0,"s":"L8","clf":0.9,"c":10}
            ]"#,
        );

        let source = BhuvanDirectory::new(tmp.path());
        let lake = source
            .area_records("1007878045612624311")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(lake.lake_name.as_deref(), Some("Hussain Sagar"));
        assert_eq!(lake.records.len(), 2);
        assert_eq!(lake.records[0].area, Some(410.2));
    }

    #[tokio::test]
    async fn missing_directory_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let source = BhuvanDirectory::new(tmp.path());
        assert!(source.load("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_metadata_keeps_records() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("7");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DAILY_AREA_FILE), r#"[{"st":"2021-06-01","a":12.5}]"#).unwrap();

        let lake = BhuvanDirectory::new(tmp.path())
            .load("7")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lake.lake_name, None);
        assert_eq!(lake.records.len(), 1);
    }

    #[tokio::test]
    async fn malformed_entries_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_lake(
            tmp.path(),
            "9",
            "[]",
            r#"[{"st":"2021-06-01","a":12.5}, "oops", 17, {"st":"2021-06-02","a":"bad"}]"#,
        );

        let lake = BhuvanDirectory::new(tmp.path())
            .load("9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(lake.records.len(), 2);
        assert_eq!(lake.records[1].area, None);
    }

    #[tokio::test]
    async fn invalid_daily_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write_lake(tmp.path(), "3", "[]", "{not json");

        let err = BhuvanDirectory::new(tmp.path()).load("3").await.unwrap_err();
        assert!(matches!(err, IngestError::InvalidJson { .. }));
    }
}
