use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{FamilyGraphError, Result};

/// Name of the configuration file stored inside the `.familygraph` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding familygraph metadata.
pub const FAMILYGRAPH_DIR: &str = ".familygraph";

/// Which parsing service turns family text into records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserKind {
    /// Corpus blocks already hold JSON family records.
    #[default]
    Json,
    /// A remote parsing endpoint.
    Http,
}

/// Parsing service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub kind: ParserKind,
    /// Endpoint URL, required for `http`.
    pub endpoint: Option<String>,
    /// Bearer token sent to the endpoint.
    pub api_key: Option<String>,
    /// Upper bound for a single parse call.
    pub timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            kind: ParserKind::Json,
            endpoint: None,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

/// Background prefetch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefetchConfig {
    /// Start prefetching after every foreground resolution.
    pub enabled: bool,
    /// Stop after this many families; `None` walks to the end of the corpus.
    pub max_families: Option<usize>,
    /// Pause between two prefetched families.
    pub delay_ms: u64,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_families: None,
            delay_ms: 0,
        }
    }
}

/// Configuration for a familygraph project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyGraphConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Corpus text file, relative to the project root unless absolute.
    pub corpus_path: String,
    /// Resolve linked families; off yields nuclear-only networks.
    pub resolve_cross_references: bool,
    pub parser: ParserConfig,
    pub prefetch: PrefetchConfig,
    /// Extra given-name pairs treated as the same name.
    pub custom_name_equivalences: Vec<(String, String)>,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for FamilyGraphConfig {
    fn default() -> Self {
        Self {
            version: 1,
            corpus_path: "corpus.txt".to_string(),
            resolve_cross_references: true,
            parser: ParserConfig::default(),
            prefetch: PrefetchConfig::default(),
            custom_name_equivalences: Vec::new(),
            log_filter: "familygraph=info".to_string(),
        }
    }
}

impl FamilyGraphConfig {
    /// Absolute corpus path for a project root.
    pub fn corpus_file(&self, project_root: &Path) -> PathBuf {
        let path = Path::new(&self.corpus_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_root.join(path)
        }
    }
}

/// Returns the path to the `.familygraph` directory within the given project root.
pub fn get_familygraph_dir(project_root: &Path) -> PathBuf {
    project_root.join(FAMILYGRAPH_DIR)
}

/// Returns the path to the configuration file within the `.familygraph` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_familygraph_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns the default
/// configuration.
pub fn load_config(project_root: &Path) -> Result<FamilyGraphConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(FamilyGraphConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| FamilyGraphError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: FamilyGraphConfig =
        serde_json::from_str(&contents).map_err(|e| FamilyGraphError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;

    validate_config(&config)?;
    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(project_root: &Path, config: &FamilyGraphConfig) -> Result<()> {
    let dir = get_familygraph_dir(project_root);
    fs::create_dir_all(&dir).map_err(|e| FamilyGraphError::Config {
        message: format!(
            "failed to create familygraph directory '{}': {}",
            dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| FamilyGraphError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| FamilyGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| FamilyGraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Rejects settings that cannot work at runtime.
pub fn validate_config(config: &FamilyGraphConfig) -> Result<()> {
    if config.parser.kind == ParserKind::Http
        && config
            .parser
            .endpoint
            .as_deref()
            .map_or(true, |e| e.trim().is_empty())
    {
        return Err(FamilyGraphError::Config {
            message: "http parser requires an endpoint".to_string(),
        });
    }
    if config.parser.timeout_secs == 0 {
        return Err(FamilyGraphError::Config {
            message: "parser timeout must be at least one second".to_string(),
        });
    }
    Ok(())
}
