//! Configuration for polygon loading and grouping.
//!
//! Every type here is serializable so that a run can be described in JSON or,
//! with the `toml` feature, TOML.
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// How polygon file names are matched while scanning a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileMatch {
    /// Name contains `.geojson` or `.json` anywhere (so `a.jsontxt` matches too)
    #[default]
    Substring,
    /// Extension is exactly `geojson` or `json`
    Extension,
}

impl FileMatch {
    /// Whether a directory entry name selects a polygon file.
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            FileMatch::Substring => file_name.contains(".geojson") || file_name.contains(".json"),
            FileMatch::Extension => std::path::Path::new(file_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == "geojson" || ext == "json"),
        }
    }
}

/// What to do with a polygon file that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPolicy {
    /// Abort loading with `MalformedFeatureFile`
    #[default]
    Fail,
    /// Log a warning and continue with the remaining files
    Skip,
}

/// Options for reading a polygon directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CatalogOptions {
    #[serde(default)]
    pub file_match: FileMatch,

    /// Sort entries by file name instead of keeping the raw listing order.
    #[serde(default)]
    pub sorted_listing: bool,

    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

/// Grouping engine configuration.
///
/// # Example
///
/// ```rust
/// use tilegroup::{FileMatch, GroupingConfig};
///
/// let config = GroupingConfig::default();
/// assert_eq!(config.max_group_size, 500);
/// assert_eq!(config.cell_size, 300.0);
///
/// let json = r#"{
///     "cell_size": 150.0,
///     "catalog": { "file_match": "extension" }
/// }"#;
/// let config = GroupingConfig::from_json(json).unwrap();
/// assert_eq!(config.catalog.file_match, FileMatch::Extension);
/// assert_eq!(config.max_group_size, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Upper bound on group size for the kd-tree split
    #[serde(default = "GroupingConfig::default_max_group_size")]
    pub max_group_size: usize,

    /// Edge length of the merge grid, in geometry coordinate units
    #[serde(default = "GroupingConfig::default_cell_size")]
    pub cell_size: f64,

    #[serde(default)]
    pub catalog: CatalogOptions,
}

impl GroupingConfig {
    const fn default_max_group_size() -> usize {
        500
    }

    const fn default_cell_size() -> f64 {
        300.0
    }

    pub fn with_max_group_size(mut self, max_group_size: usize) -> Self {
        self.max_group_size = max_group_size;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_catalog(mut self, catalog: CatalogOptions) -> Self {
        self.catalog = catalog;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_group_size == 0 {
            return Err("Max group size must be greater than zero".to_string());
        }
        if !self.cell_size.is_finite() {
            return Err("Cell size must be finite (not NaN or infinity)".to_string());
        }
        if self.cell_size <= 0.0 {
            return Err("Cell size must be positive".to_string());
        }
        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: GroupingConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: GroupingConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            max_group_size: Self::default_max_group_size(),
            cell_size: Self::default_cell_size(),
            catalog: CatalogOptions::default(),
        }
    }
}
