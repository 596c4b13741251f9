// LogcatLens - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::converter::LogFormat;
use crate::core::filter::FilterInputs;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogcatLens configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logcatlens/).
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of config.toml inside the config directory.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so a newer config file still loads.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub logging: LoggingSection,
    pub history: HistorySection,
    pub detection: DetectionSection,
    /// Default filter field values, same keys as `FilterInputs`.
    pub filters: FilterInputs,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// `[history]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct HistorySection {
    /// Entries remembered per filter field.
    pub max_entries: Option<usize>,
}

/// `[detection]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    /// Converter names in the order they are tried.
    pub candidates: Option<Vec<String>>,
}

/// Validated application configuration.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Entries remembered per filter field.
    pub history_size: usize,
    /// Converters tried by auto-detection, in order.
    pub candidates: Vec<LogFormat>,
    /// Filter field values applied at startup.
    pub default_filters: FilterInputs,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: None,
            history_size: constants::DEFAULT_HISTORY_SIZE,
            candidates: LogFormat::all().to_vec(),
            default_filters: FilterInputs::default(),
        }
    }
}

/// Load and validate config.toml at `path`.
///
/// A missing file yields defaults with no warnings (first run). An
/// unreadable or unparseable file yields defaults plus one warning; the
/// application still starts.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings = Vec::new();

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw(path) {
        Ok(raw) => raw,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %path.display(), "Loaded config.toml");
    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }
    (config, warnings)
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    expected: "error, warn, info, debug, trace".to_string(),
                }
                .to_string(),
            );
        }
    }

    // -- History: max_entries --
    if let Some(size) = raw.history.max_entries {
        if (constants::MIN_HISTORY_SIZE..=constants::MAX_HISTORY_SIZE).contains(&size) {
            config.history_size = size;
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "history.max_entries".to_string(),
                    value: size.to_string(),
                    expected: format!(
                        "{}-{}",
                        constants::MIN_HISTORY_SIZE,
                        constants::MAX_HISTORY_SIZE
                    ),
                }
                .to_string(),
            );
        }
    }

    // -- Detection: candidates --
    if let Some(names) = raw.detection.candidates {
        let mut candidates = Vec::new();
        for name in &names {
            match name.parse::<LogFormat>() {
                Ok(format) if !candidates.contains(&format) => candidates.push(format),
                Ok(_) => {}
                Err(e) => warnings.push(format!("[detection] candidates: {e}")),
            }
        }
        if candidates.is_empty() {
            warnings.push(
                "[detection] candidates lists no known format. Using default order.".to_string(),
            );
        } else {
            config.candidates = candidates;
        }
    }

    // -- Filters: min_level --
    let min_level = raw.filters.min_level.trim();
    if !min_level.is_empty() {
        if let Err(e) = min_level.parse::<crate::core::model::Level>() {
            warnings.push(format!("[filters] min_level: {e}. No level floor applied."));
        }
    }
    config.default_filters = raw.filters;

    config
}
