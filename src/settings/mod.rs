use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("could not read settings file: {0}")]
    Read(#[from] std::io::Error),
    #[error("could not parse settings JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("missing required setting: {0}")]
    MissingKey(&'static str),
}

/// Process-wide settings, loaded once from a JSON file and read-only
/// thereafter.
#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub credentials: Credentials,
    #[serde(default)]
    pub file_path: Option<PathBuf>,
    #[serde(default)]
    pub file_path2: Option<PathBuf>,
    #[serde(default)]
    pub dir_path: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub columns_mapping: ColumnsMapping,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    pub host: String,
    pub identifier: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ColumnsMapping {
    /// Output base name override for filled templates.
    #[serde(default)]
    pub file: Option<String>,
    /// Output extension override for filled templates.
    #[serde(default)]
    pub file_ext: Option<String>,
    #[serde(default)]
    pub objects: ObjectColumns,
}

/// Columns of the object-importer source table, keyed by logical field.
#[derive(Clone, Debug, Deserialize)]
pub struct ObjectColumns {
    #[serde(default = "default_name_column")]
    pub name: String,
    #[serde(default = "default_plantation_year_column")]
    pub plantation_year: String,
    #[serde(default = "default_germplasm_code_column")]
    pub germplasm_code: String,
    #[serde(default = "default_longitude_column")]
    pub longitude: String,
    #[serde(default = "default_latitude_column")]
    pub latitude: String,
}

// Column names of the original orchard spreadsheets
fn default_name_column() -> String {
    "Nom".into()
}
fn default_plantation_year_column() -> String {
    "plantation".into()
}
fn default_germplasm_code_column() -> String {
    "FBUNQ_simple".into()
}
fn default_longitude_column() -> String {
    "long".into()
}
fn default_latitude_column() -> String {
    "lat".into()
}

impl Default for ObjectColumns {
    fn default() -> Self {
        ObjectColumns {
            name: default_name_column(),
            plantation_year: default_plantation_year_column(),
            germplasm_code: default_germplasm_code_column(),
            longitude: default_longitude_column(),
            latitude: default_latitude_column(),
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        fs::read_to_string(path)?.parse()
    }

    pub fn source_table_path(&self) -> Result<&Path, SettingsError> {
        self.file_path
            .as_deref()
            .ok_or(SettingsError::MissingKey("file_path"))
    }

    pub fn measurement_sheet_path(&self) -> Result<&Path, SettingsError> {
        self.file_path2
            .as_deref()
            .ok_or(SettingsError::MissingKey("file_path2"))
    }

    pub fn image_root(&self) -> Result<&Path, SettingsError> {
        self.dir_path
            .as_deref()
            .ok_or(SettingsError::MissingKey("dir_path"))
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(Path::new("."))
    }
}

impl FromStr for Settings {
    type Err = SettingsError;

    fn from_str(settings_raw: &str) -> Result<Self, Self::Err> {
        serde_json::from_str::<Settings>(settings_raw).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SETTINGS: &str = r#"
    {
        "credentials": {
            "host": "https://opensilex.example.org/rest",
            "identifier": "importer@example.org",
            "password": "secret"
        }
    }
    "#;

    const FULL_SETTINGS: &str = r#"
    {
        "credentials": {
            "host": "https://opensilex.example.org/rest",
            "identifier": "importer@example.org",
            "password": "secret"
        },
        "file_path": "trees.xlsx",
        "file_path2": "measurements.xlsx",
        "dir_path": "acquisition",
        "output_dir": "filled",
        "columns_mapping": {
            "file": "dataset_template_bbch",
            "file_ext": "csv",
            "objects": { "name": "TreeName" }
        },
        "dry_run": true
    }
    "#;

    #[test]
    fn minimal_settings_use_defaults() {
        let settings: Settings = MINIMAL_SETTINGS.parse().unwrap();
        assert!(!settings.dry_run);
        assert_eq!(settings.columns_mapping.objects.name, "Nom");
        assert_eq!(settings.columns_mapping.objects.longitude, "long");
        assert_eq!(settings.output_dir(), Path::new("."));
        assert!(matches!(
            settings.source_table_path(),
            Err(SettingsError::MissingKey("file_path"))
        ));
    }

    #[test]
    fn full_settings_override_defaults() {
        let settings: Settings = FULL_SETTINGS.parse().unwrap();
        assert!(settings.dry_run);
        assert_eq!(settings.source_table_path().unwrap(), Path::new("trees.xlsx"));
        assert_eq!(settings.image_root().unwrap(), Path::new("acquisition"));
        assert_eq!(settings.output_dir(), Path::new("filled"));
        assert_eq!(settings.columns_mapping.objects.name, "TreeName");
        // Unspecified nested columns keep their defaults
        assert_eq!(settings.columns_mapping.objects.latitude, "lat");
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            "not json".parse::<Settings>(),
            Err(SettingsError::ParseJson(_))
        ));
    }
}
