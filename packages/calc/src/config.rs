use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// Unified config (figment-deserialized from defaults / config.toml / env vars)
// =============================================================================
//
// Three equivalent ways to configure:
//
//   config.toml:     [backend]
//                    kind = "http"
//
//   env var:         CALC_BACKEND__KIND=http   (double underscore = nesting)
//
//   CLI flag:        calc --backend http       (applied on top of both)

/// Where arithmetic happens.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process arithmetic
    #[default]
    Local,
    /// Remote arithmetic backend over HTTP
    Http,
}

/// Top-level tunable configuration, deserialized by figment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub backend: BackendFileConfig,
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Backend selection (lives under `[backend]` in config.toml).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackendFileConfig {
    #[serde(default)]
    pub kind: BackendKind,
    /// Base URL of the HTTP backend; only read when `kind = "http"`.
    #[serde(default = "default_backend_url")]
    pub url: String,
}

impl Default for BackendFileConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: default_backend_url(),
        }
    }
}

/// Bind address for `calc serve` (lives under `[server]` in config.toml).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerFileConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerFileConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7878
}
fn default_backend_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

/// Build a figment that layers: defaults → config.toml → CALC_* env vars.
///
/// Env vars use double-underscore for nesting into sections:
///   `CALC_BACKEND__KIND=http`  →  `backend.kind = "http"`
///   `CALC_SERVER__PORT=9000`   →  `server.port = 9000`
pub fn load_config(config_dir: &Path) -> figment::Figment {
    use figment::{
        Figment,
        providers::{Env, Format, Serialized, Toml},
    };

    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(config_dir.join("config.toml")))
        .merge(Env::prefixed("CALC_").split("__"))
}

// =============================================================================
// Directory layout (not tunable via figment, derived from --config-dir)
// =============================================================================

#[derive(Clone, Debug)]
pub struct CalcConfig {
    pub config_dir: PathBuf,
    pub log_path: PathBuf,
}

impl CalcConfig {
    pub fn new(custom_dir: Option<PathBuf>) -> Result<Self> {
        let config_dir = match custom_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .context("Could not find a config directory")?
                .join("calc"),
        };

        std::fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;

        let log_path = config_dir.join("calc.log");
        Ok(Self {
            config_dir,
            log_path,
        })
    }

    /// Resolve the layered file/env config for this directory.
    pub fn file_config(&self) -> Result<FileConfig> {
        load_config(&self.config_dir)
            .extract()
            .context("Invalid calc configuration")
    }
}
