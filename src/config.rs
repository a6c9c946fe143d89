//! Configuration for openvalve.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (OPENVALVE_HOME, OPENVALVE_API_URL)
//! 2. Config file (.openvalve/config.yaml)
//! 3. Defaults (~/.openvalve, http://localhost:5000)
//!
//! Config file discovery:
//! - Searches current directory and parents for .openvalve/config.yaml
//! - `paths.home` in the config file is relative to the .openvalve/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default API origin
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub api: Option<ApiConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to the .openvalve/ directory)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to openvalve home (persisted state)
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// API connection settings
    pub api: ApiSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl ResolvedConfig {
    /// Where the "my account" selection is stored
    pub fn my_account_path(&self) -> PathBuf {
        self.home.join("my_account.json")
    }
}

/// Values taken from the environment
#[derive(Debug, Clone, Default)]
struct EnvOverrides {
    home: Option<String>,
    api_url: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("OPENVALVE_HOME").ok(),
            api_url: std::env::var("OPENVALVE_API_URL").ok(),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".openvalve").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Combine defaults, an optional config file and environment overrides
fn resolve(
    default_home: PathBuf,
    config_file: Option<(PathBuf, ConfigFile)>,
    env: EnvOverrides,
) -> ResolvedConfig {
    let mut home = default_home;
    let mut api = ApiSettings::default();
    let mut config_path = None;

    if let Some((path, file)) = config_file {
        if let Some(ref home_path) = file.paths.home {
            let openvalve_dir = path.parent().unwrap_or(Path::new("."));
            home = resolve_path(openvalve_dir, home_path);
        }
        if let Some(file_api) = file.api {
            if let Some(base_url) = file_api.base_url {
                api.base_url = base_url;
            }
            if let Some(timeout) = file_api.timeout_seconds {
                api.timeout_seconds = timeout;
            }
        }
        config_path = Some(path);
    }

    if let Some(env_home) = env.home {
        home = PathBuf::from(env_home);
    }
    if let Some(env_url) = env.api_url {
        api.base_url = env_url;
    }

    ResolvedConfig {
        home,
        config_file: config_path,
        api,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".openvalve");

    let config_file = match find_config_file() {
        Some(path) => {
            let file = load_config_file(&path)?;
            Some((path, file))
        }
        None => None,
    };

    Ok(resolve(default_home, config_file, EnvOverrides::from_env()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}
