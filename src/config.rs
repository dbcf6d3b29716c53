//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (Vennesla, public Overpass instance)
//! 2. Global config: `$XDG_CONFIG_HOME/osmfetch/osmfetch.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `OSMFETCH_*` prefix, `__` for nesting
//!    (e.g. `OSMFETCH_BBOX__SOUTH=58.2`)
//!
//! Command line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, BoundingBox};

/// Public Overpass API instance.
pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Unified configuration for osmfetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Overpass interpreter URL
    pub endpoint: String,
    /// Client-side bound for the whole HTTP exchange, in seconds
    pub request_timeout_secs: u64,
    /// Server-side query timeout (`[timeout:N]`), in seconds
    pub query_timeout_secs: u32,
    /// Area label recorded in output metadata
    pub area: String,
    /// Output file
    pub output: PathBuf,
    /// Area to fetch
    pub bbox: BoundingBox,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 120,
            query_timeout_secs: 60,
            area: "vennesla".to_string(),
            output: PathBuf::from("data/vennesla_osm.json"),
            bbox: BoundingBox::VENNESLA,
        }
    }
}

/// Bounding box fields as given by a single config layer.
///
/// Fields are merged one by one across layers and validated only once the
/// final box is assembled.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RawBoundingBox {
    pub south: Option<f64>,
    pub west: Option<f64>,
    pub north: Option<f64>,
    pub east: Option<f64>,
}

impl RawBoundingBox {
    fn overlay(self, top: Self) -> Self {
        Self {
            south: top.south.or(self.south),
            west: top.west.or(self.west),
            north: top.north.or(self.north),
            east: top.east.or(self.east),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified in this layer).
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    pub endpoint: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub query_timeout_secs: Option<u32>,
    pub area: Option<String>,
    pub output: Option<PathBuf>,
    pub bbox: RawBoundingBox,
}

impl RawSettings {
    /// Layer `top` over `self`: values specified in `top` win.
    pub fn overlay(self, top: Self) -> Self {
        Self {
            endpoint: top.endpoint.or(self.endpoint),
            request_timeout_secs: top.request_timeout_secs.or(self.request_timeout_secs),
            query_timeout_secs: top.query_timeout_secs.or(self.query_timeout_secs),
            area: top.area.or(self.area),
            output: top.output.or(self.output),
            bbox: self.bbox.overlay(top.bbox),
        }
    }
}

/// Get the XDG config directory for osmfetch.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "osmfetch").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("osmfetch.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Load settings with layered precedence, using the global config file if present.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path();
        Self::load_from(global.as_deref(), config_file)
    }

    /// Load settings from the given global and explicit config files.
    ///
    /// A missing global file is skipped; a missing explicit file is an error.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut raw = RawSettings::default();

        if let Some(global_path) = global {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                raw = raw.overlay(load_raw_settings(global_path)?);
            }
        }

        if let Some(local_path) = local {
            debug!("load: config {}", local_path.display());
            raw = raw.overlay(load_raw_settings(local_path)?);
        }

        raw = raw.overlay(Self::env_overrides()?);

        Self::from_raw(raw)
    }

    /// Resolve merged raw settings against the defaults and validate the result.
    pub fn from_raw(raw: RawSettings) -> Result<Self, ApplicationError> {
        let defaults = Self::default();
        let bbox = BoundingBox::new(
            raw.bbox.south.unwrap_or(defaults.bbox.south()),
            raw.bbox.west.unwrap_or(defaults.bbox.west()),
            raw.bbox.north.unwrap_or(defaults.bbox.north()),
            raw.bbox.east.unwrap_or(defaults.bbox.east()),
        )?;

        let mut settings = Self {
            endpoint: raw.endpoint.unwrap_or(defaults.endpoint),
            request_timeout_secs: raw
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
            query_timeout_secs: raw.query_timeout_secs.unwrap_or(defaults.query_timeout_secs),
            area: raw.area.unwrap_or(defaults.area),
            output: raw.output.unwrap_or(defaults.output),
            bbox,
        };

        settings.expand_paths();
        settings.validate()?;
        Ok(settings)
    }

    /// Read OSMFETCH_* environment variables into a raw layer.
    fn env_overrides() -> Result<RawSettings, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("OSMFETCH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        Ok(RawSettings {
            endpoint: env_value(&config, "endpoint")?,
            request_timeout_secs: env_value(&config, "request_timeout_secs")?,
            query_timeout_secs: env_value(&config, "query_timeout_secs")?,
            area: env_value(&config, "area")?,
            output: env_value::<String>(&config, "output")?.map(PathBuf::from),
            bbox: RawBoundingBox {
                south: env_value(&config, "bbox.south")?,
                west: env_value(&config, "bbox.west")?,
                north: env_value(&config, "bbox.north")?,
                east: env_value(&config, "bbox.east")?,
            },
        })
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output.to_string_lossy().as_ref());
        self.output = PathBuf::from(expanded);
    }

    /// Check settings that the type system does not already guarantee.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ApplicationError::Config {
                message: format!("endpoint must be an http(s) URL: '{}'", self.endpoint),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "request_timeout_secs must be greater than zero".into(),
            });
        }
        if self.query_timeout_secs == 0 {
            return Err(ApplicationError::Config {
                message: "query_timeout_secs must be greater than zero".into(),
            });
        }
        if self.output.as_os_str().is_empty() {
            return Err(ApplicationError::Config {
                message: "output path must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# osmfetch configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/osmfetch/osmfetch.toml
#   File:   --config <file>
#   Env:    OSMFETCH_* environment variables (OSMFETCH_BBOX__SOUTH=...)
#   CLI:    --area, --output, --bbox, --endpoint

# Overpass interpreter URL
# endpoint = "https://overpass-api.de/api/interpreter"

# Client-side time bound for the request, in seconds
# request_timeout_secs = 120

# Server-side query timeout, in seconds
# query_timeout_secs = 60

# Label recorded in output metadata
# area = "vennesla"

# Output file (~ and $VAR are expanded)
# output = "data/vennesla_osm.json"

[bbox]
# south = 58.25
# west = 7.90
# north = 58.35
# east = 8.05
"#
        .to_string()
    }
}

/// Fetch an optional value, treating "not set" as `None` and anything else as an error.
fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
