use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "skolni-mapa.toml";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub columns: ColumnConfig,
    pub map: MapConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub schools: PathBuf,
    pub boundaries: PathBuf,
    /// Field separator of the school dataset
    pub delimiter: char,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            schools: PathBuf::from("celk_df_f.csv"),
            boundaries: PathBuf::from("kraje.json"),
            delimiter: '#',
        }
    }
}

/// Column names of the school dataset
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColumnConfig {
    pub name: String,
    pub authority: String,
    pub region: String,
    pub coordinates: String,
    /// Every other column starting with this prefix holds a school type
    pub type_prefix: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            name: "nazev".to_string(),
            authority: "zrizovatel_dropdown".to_string(),
            region: "Region".to_string(),
            coordinates: "Coordinates".to_string(),
            type_prefix: "nazev".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    /// Circle marker radius in screen pixels
    pub marker_radius: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { marker_radius: 4 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub file: PathBuf,
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("skolni-mapa.log"),
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config file if present, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Dataset delimiter as a single byte for the CSV reader
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII
        self.data.delimiter as u8
    }

    fn validate(&self) -> Result<()> {
        if !self.data.delimiter.is_ascii() {
            anyhow::bail!(
                "data.delimiter must be a single ASCII character, got {:?}",
                self.data.delimiter
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_register_export() {
        let config = AppConfig::default();
        assert_eq!(config.delimiter_byte(), b'#');
        assert_eq!(config.columns.authority, "zrizovatel_dropdown");
        assert_eq!(config.map.marker_radius, 4);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data]\nschools = \"skoly.csv\"\n\n[map]\nmarker_radius = 6").unwrap();

        let config = AppConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.data.schools, PathBuf::from("skoly.csv"));
        assert_eq!(config.data.boundaries, PathBuf::from("kraje.json"));
        assert_eq!(config.map.marker_radius, 6);
        assert_eq!(config.columns.region, "Region");
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[data]\ndelimiter = \"§\"").unwrap();
        assert!(AppConfig::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.log.level, "info");
    }
}
