// Configuration loading and parsing (config/draw.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single configuration file inside `config/` and `defaults/`.
pub const CONFIG_FILE: &str = "draw.toml";

/// Sliders never go past this, whatever the config says.
pub const SLIDER_CEILING: usize = 10;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// draw.toml structs
// ---------------------------------------------------------------------------

/// The assembled configuration. Every section falls back to its defaults,
/// so a partial file (or an empty one) is valid.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub roster: RosterConfig,
    pub columns: ColumnsConfig,
    pub encodings: EncodingsConfig,
    pub normalize: NormalizeConfig,
    pub sampling: SamplingConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub directory: PathBuf,
}

impl Default for RosterConfig {
    fn default() -> Self {
        RosterConfig {
            directory: PathBuf::from("./server_files"),
        }
    }
}

/// Which raw columns hold the player name and the tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub name: usize,
    pub tag: usize,
    /// When false the tag column is neither required nor rendered.
    pub with_tag: bool,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        ColumnsConfig {
            name: 1,
            tag: 2,
            with_tag: true,
        }
    }
}

impl ColumnsConfig {
    /// The tag column index, if tags are in use.
    pub fn tag_column(&self) -> Option<usize> {
        self.with_tag.then_some(self.tag)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EncodingsConfig {
    pub candidates: Vec<String>,
    pub sniff_bom: bool,
}

impl Default for EncodingsConfig {
    fn default() -> Self {
        EncodingsConfig {
            candidates: vec!["utf-8".into(), "ISO-8859-1".into(), "latin1".into()],
            sniff_bom: true,
        }
    }
}

/// Cell values read as "no value": the NA set of the usual tabular
/// readers, matched exactly.
pub const DEFAULT_MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    pub recode_names: bool,
    pub strip_whitespace: bool,
    pub excluded_tags: Vec<String>,
    pub tag_separator: String,
    /// `(from, to)` literal substring replacements applied to the formatted entry.
    pub artifact_fixes: Vec<(String, String)>,
    pub split_case_transitions: bool,
    pub missing_markers: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            recode_names: true,
            strip_whitespace: true,
            excluded_tags: vec!["PT".into()],
            tag_separator: String::new(),
            artifact_fixes: vec![("TM(".into(), " (".into())],
            split_case_transitions: true,
            missing_markers: DEFAULT_MISSING_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub slider_max: usize,
    pub default_min: usize,
    pub default_max: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        SamplingConfig {
            slider_max: 3,
            default_min: 0,
            default_max: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            directory: PathBuf::from("draws"),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/draw.toml` relative to `base_dir`.
///
/// Does not seed missing files from `defaults/`; `load_config()` does that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config = parse_config(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Parse config text without validating it.
pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Copy `defaults/draw.toml` to `config/draw.toml` when the latter is
/// missing. Returns the path written, or `None` if a config was already there.
pub fn ensure_config_file(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let source = base_dir.join("defaults").join(CONFIG_FILE);
    if !source.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither config/{CONFIG_FILE} nor defaults/{CONFIG_FILE} found in {}",
                base_dir.display()
            ),
        });
    }

    if let Some(config_dir) = target.parent() {
        std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create config directory: {e}"),
        })?;
    }
    std::fs::copy(&source, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {}: {e}", source.display()),
    })?;

    Ok(Some(target))
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Seeds `config/draw.toml` from `defaults/` before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_file(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    // Encodings
    let enc = &config.encodings;
    if enc.candidates.is_empty() && !enc.sniff_bom {
        return Err(ConfigError::ValidationError {
            field: "encodings.candidates".into(),
            message: "must name at least one encoding when sniff_bom is off".into(),
        });
    }
    for label in &enc.candidates {
        if encoding_rs::Encoding::for_label(label.trim().as_bytes()).is_none() {
            return Err(ConfigError::ValidationError {
                field: "encodings.candidates".into(),
                message: format!("unknown encoding label '{label}'"),
            });
        }
    }

    // Columns
    let cols = &config.columns;
    if cols.with_tag && cols.name == cols.tag {
        return Err(ConfigError::ValidationError {
            field: "columns.tag".into(),
            message: format!("must differ from columns.name ({})", cols.name),
        });
    }

    // Normalization
    if config
        .normalize
        .artifact_fixes
        .iter()
        .any(|(from, _)| from.is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "normalize.artifact_fixes".into(),
            message: "replacement patterns must not be empty".into(),
        });
    }

    // Sampling
    let s = &config.sampling;
    if s.slider_max > SLIDER_CEILING {
        return Err(ConfigError::ValidationError {
            field: "sampling.slider_max".into(),
            message: format!("must be <= {SLIDER_CEILING}, got {}", s.slider_max),
        });
    }
    if s.default_max > s.slider_max {
        return Err(ConfigError::ValidationError {
            field: "sampling.default_max".into(),
            message: format!(
                "must be <= sampling.slider_max ({}), got {}",
                s.slider_max, s.default_max
            ),
        });
    }
    if s.default_min > s.default_max {
        return Err(ConfigError::ValidationError {
            field: "sampling.default_min".into(),
            message: format!(
                "must be <= sampling.default_max ({}), got {}",
                s.default_max, s.default_min
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
