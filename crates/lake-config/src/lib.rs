use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

const DEFAULT_BIND: &str = "0.0.0.0:3001";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_FIRST_BOUNDARY_YEAR: i32 = 1984;
const DEFAULT_LAST_BOUNDARY_YEAR: i32 = 2024;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root of the data tree
    pub dir: Option<PathBuf>,
    /// Bhuvan WBIS exports, one directory per water body
    pub bhuvan_dir: Option<PathBuf>,
    pub water_quality_csv: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundariesConfig {
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
}

/// Additions to the built-in lake catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LakesConfig {
    /// Lake name as written in the water-quality data -> lake id
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    /// Lake id -> Bhuvan water-body id
    #[serde(default)]
    pub bhuvan_ids: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    pub data: Option<DataConfig>,
    pub boundaries: Option<BoundariesConfig>,
    pub lakes: Option<LakesConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid boundary years: {first} > {last}")]
    BoundaryYears { first: i32, last: i32 },
}

impl AppConfig {
    /// Load configuration from LAKEWATCH_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("LAKEWATCH_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        if Path::new(&path).exists() {
            Self::from_toml(&fs::read_to_string(&path)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn from_toml(s: &str) -> Result<Self, ConfigError> {
        let cfg = toml::from_str::<AppConfig>(s)?;
        let years = cfg.boundary_years();
        if years.is_empty() {
            return Err(ConfigError::BoundaryYears {
                first: *years.start(),
                last: *years.end(),
            });
        }
        Ok(cfg)
    }

    /// Get HTTP bind address (default 0.0.0.0:3001)
    pub fn http_bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|s| s.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Defaults to `<data_dir>/bhuvan-wbis`
    pub fn bhuvan_dir(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.bhuvan_dir.clone())
            .unwrap_or_else(|| self.data_dir().join("bhuvan-wbis"))
    }

    /// Defaults to `<data_dir>/water-quality/hyderabad_lakes_water_quality.csv`
    pub fn water_quality_csv(&self) -> PathBuf {
        self.data
            .as_ref()
            .and_then(|d| d.water_quality_csv.clone())
            .unwrap_or_else(|| {
                self.data_dir()
                    .join("water-quality")
                    .join("hyderabad_lakes_water_quality.csv")
            })
    }

    /// Years with a published lake boundary file (default 1984..=2024)
    pub fn boundary_years(&self) -> RangeInclusive<i32> {
        let b = self.boundaries.as_ref();
        let first = b
            .and_then(|b| b.first_year)
            .unwrap_or(DEFAULT_FIRST_BOUNDARY_YEAR);
        let last = b
            .and_then(|b| b.last_year)
            .unwrap_or(DEFAULT_LAST_BOUNDARY_YEAR);
        first..=last
    }

    pub fn lake_aliases(&self) -> BTreeMap<String, String> {
        self.lakes
            .as_ref()
            .map(|l| l.aliases.clone())
            .unwrap_or_default()
    }

    pub fn lake_bhuvan_ids(&self) -> BTreeMap<String, String> {
        self.lakes
            .as_ref()
            .map(|l| l.bhuvan_ids.clone())
            .unwrap_or_default()
    }
}
