//! Configuration system for the taskdeck server.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskdeck-server/config.toml`)
//! 4. Compiled defaults

use std::path::PathBuf;

use crate::snapshot;

/// Token secret compiled in as a development fallback. The server logs a
/// warning at startup when it is in effect.
pub const DEV_TOKEN_SECRET: &str = "taskdeck-dev-secret-change-me";

/// Errors that can occur when loading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure for the server.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerConfigFile {
    server: ServerFileSection,
    auth: AuthFileSection,
}

/// `[server]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ServerFileSection {
    bind_addr: Option<String>,
    data_path: Option<String>,
}

/// `[auth]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AuthFileSection {
    token_secret: Option<String>,
    token_ttl_minutes: Option<i64>,
}

// ---------------------------------------------------------------------------
// CLI arguments
// ---------------------------------------------------------------------------

/// CLI arguments for the taskdeck server.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Taskdeck API server")]
pub struct ServerCliArgs {
    /// Address to bind the API server to.
    #[arg(short, long, env = "TASKDECK_ADDR")]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/taskdeck-server/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the JSON state file. An empty value disables persistence.
    #[arg(long, env = "TASKDECK_DATA")]
    pub data_path: Option<String>,

    /// Secret used to sign bearer tokens.
    #[arg(long, env = "TASKDECK_SECRET")]
    pub token_secret: Option<String>,

    /// Bearer token lifetime in minutes.
    #[arg(long)]
    pub token_ttl_minutes: Option<i64>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKDECK_LOG")]
    pub log_level: String,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to (e.g., `127.0.0.1:8000`).
    pub bind_addr: String,
    /// Where to persist the JSON state snapshot. `None` disables
    /// persistence (pure in-memory mode).
    pub data_path: Option<PathBuf>,
    /// Secret used to sign and verify bearer tokens.
    pub token_secret: String,
    /// Bearer token lifetime in minutes.
    pub token_ttl_minutes: i64,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            data_path: snapshot::default_data_path(),
            token_secret: DEV_TOKEN_SECRET.to_string(),
            token_ttl_minutes: 30,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path is tried and a missing
    /// file is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Returns `true` when the compiled-in development secret is in use.
    #[must_use]
    pub fn uses_default_secret(&self) -> bool {
        self.token_secret == DEV_TOKEN_SECRET
    }

    /// Resolve a `ServerConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. An explicitly empty `data_path`
    /// disables persistence rather than falling back to the default path.
    #[must_use]
    fn resolve(cli: &ServerCliArgs, file: &ServerConfigFile) -> Self {
        let defaults = Self::default();

        let data_path = cli
            .data_path
            .clone()
            .or_else(|| file.server.data_path.clone())
            .map_or(defaults.data_path, |raw| {
                if raw.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(raw))
                }
            });

        Self {
            bind_addr: cli
                .bind
                .clone()
                .or_else(|| file.server.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            data_path,
            token_secret: cli
                .token_secret
                .clone()
                .or_else(|| file.auth.token_secret.clone())
                .unwrap_or(defaults.token_secret),
            token_ttl_minutes: cli
                .token_ttl_minutes
                .or(file.auth.token_ttl_minutes)
                .unwrap_or(defaults.token_ttl_minutes),
            log_level: cli.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file for the server.
fn load_config_file(
    explicit_path: Option<&std::path::Path>,
) -> Result<ServerConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ServerConfigFile::default());
        };
        config_dir.join("taskdeck-server").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ServerConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
