use crate::metadata::{EmbeddedMetadataSource, FileMetadataSource, MetadataSource};
use anyhow::{Context, bail};
use serde::Deserialize;
use std::{
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    path::PathBuf,
};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// The application name.
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// The environment to report when the version carries none.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// The application version.
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl Config {
    /// Load the config out of an optional file, overridden by `APP__*` environment variables.
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        Self::load_from(path, app_environment())
    }

    fn load_from(path: Option<&str>, environment: config::Environment) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder().add_source(environment);
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path))
        }
        let settings = builder.build().context("parsing config")?;
        let config: Self = settings.try_deserialize().context("deserializing config")?;
        if config.version.trim().is_empty() {
            bail!("version can't be empty");
        }
        Ok(config)
    }
}

fn app_environment() -> config::Environment {
    config::Environment::with_prefix("APP").separator("__")
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_endpoint")]
    pub bind_endpoint: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_endpoint: default_bind_endpoint() }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MetadataConfig {
    /// The path to a properties file containing the build metadata. When unset, the metadata embedded at
    /// build time is used.
    pub path: Option<PathBuf>,
}

impl MetadataConfig {
    /// Build the metadata source this configuration points to.
    pub fn source(&self) -> Box<dyn MetadataSource> {
        match &self.path {
            Some(path) => Box::new(FileMetadataSource::new(path)),
            None => Box::new(EmbeddedMetadataSource),
        }
    }
}

fn default_bind_endpoint() -> SocketAddr {
    // 0.0.0.0:8080
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_application_name() -> String {
    "version-api".into()
}

fn default_environment() -> String {
    "local".into()
}

fn default_version() -> String {
    "1.0.0".into()
}
