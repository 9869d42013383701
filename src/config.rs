use crate::analysis::{AnalysisSettings, gemini};
use crate::geocode;
use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// Environment variables checked, in order, for the analysis API key.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Prefix for environment overrides, e.g. `SCOUT_SERVER__PORT=8000`.
pub const ENV_PREFIX: &str = "SCOUT";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Emit JSON logs (`--log-json` alone means true)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub geocoding: GeocodingConfig,
    pub analysis: AnalysisConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    /// Directory served under `/static`.
    pub static_dir: String,
    /// Per-request timeout. Analysis calls are slow; keep this generous.
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingConfig {
    pub base_url: String,
    /// Client identifier the provider requires on every request.
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub json: bool,
}

fn default_user_agent() -> String {
    format!("PropertyScout/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 3000,
                host: "0.0.0.0".to_string(),
                static_dir: "static".to_string(),
                request_timeout_secs: 60,
            },
            geocoding: GeocodingConfig {
                base_url: geocode::DEFAULT_BASE_URL.to_string(),
                user_agent: default_user_agent(),
            },
            analysis: AnalysisConfig {
                base_url: gemini::DEFAULT_BASE_URL.to_string(),
                model: gemini::DEFAULT_MODEL.to_string(),
            },
            log: LogConfig { json: false },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layer defaults < config file < `SCOUT_*` env < CLI flags.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args).map_err(|e| ConfigError::Message(e.to_string()))?;
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.host", defaults.server.host)?
            .set_default("server.static_dir", defaults.server.static_dir)?
            .set_default(
                "server.request_timeout_secs",
                defaults.server.request_timeout_secs,
            )?
            .set_default("geocoding.base_url", defaults.geocoding.base_url)?
            .set_default("geocoding.user_agent", defaults.geocoding.user_agent)?
            .set_default("analysis.base_url", defaults.analysis.base_url)?
            .set_default("analysis.model", defaults.analysis.model)?
            .set_default("log.json", defaults.log.json)?;

        // Explicit file must exist; ./config.{yaml,toml,json} is optional.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::with_name(path).required(true)),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("log.json", json)?;
        }

        builder.build()?.try_deserialize()
    }
}

/// Resolve provider settings and the API key.
///
/// The key is the one secret the application needs; it is read from the
/// environment only, never from config files.
pub fn load_analysis_settings(config: &AnalysisConfig) -> Result<AnalysisSettings, ConfigError> {
    let api_key = API_KEY_VARS
        .iter()
        .find_map(|var| env::var(var).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| {
            ConfigError::Message(format!(
                "Missing required env var: {}",
                API_KEY_VARS.join(" or ")
            ))
        })?;

    if config.model.trim().is_empty() {
        return Err(ConfigError::Message(
            "analysis.model cannot be empty".to_string(),
        ));
    }

    Ok(AnalysisSettings {
        base_url: config.base_url.clone(),
        api_key,
        model: config.model.clone(),
    })
}
