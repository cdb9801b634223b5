use anyhow::{Context, Result};
use darkview_core::ViewerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "DARKVIEW_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "darkview.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub viewer: ViewerConfig,
    /// Directory holding the PDFium shared library
    pub pdfium_library_dir: Option<PathBuf>,
}

/// Load `$DARKVIEW_CONFIG`, else `./darkview.json` if it exists, else defaults
pub fn load() -> Result<AppConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_from(Path::new(&path)),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                load_from(path)
            } else {
                Ok(AppConfig::default())
            }
        }
    }
}

pub fn load_from(path: &Path) -> Result<AppConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .viewer
        .validate()
        .with_context(|| format!("Invalid config file {}", path.display()))?;
    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn flat_file_sets_viewer_and_library_fields() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"{ "default_scale": 1.2, "zoom_step": 0.1, "pdfium_library_dir": "/opt/pdfium/lib" }"#,
        );

        let config = load_from(&path).unwrap();
        assert_eq!(
            config,
            AppConfig {
                viewer: ViewerConfig {
                    default_scale: 1.2,
                    zoom_step: 0.1,
                    ..ViewerConfig::default()
                },
                pdfium_library_dir: Some(PathBuf::from("/opt/pdfium/lib")),
            }
        );
    }

    #[test]
    fn empty_object_is_all_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "{}");
        assert_eq!(load_from(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn invalid_ranges_are_reported_with_the_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, r#"{ "min_scale": -1 }"#);
        let err = load_from(&path).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid config file"), "{message}");
        assert!(message.contains("min_scale must be a positive number"), "{message}");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_from(&dir.path().join("absent.json")).is_err());
    }
}
