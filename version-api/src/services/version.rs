use crate::{
    metadata::MetadataCache,
    resolver::{ResolveError, VersionConfig, resolve},
};
use chrono::Utc;
use tracing::{debug, info};
use version_api_models::version::VersionInfo;

#[cfg_attr(test, mockall::automock)]
pub trait VersionService: Send + Sync {
    /// Get the version information for this service.
    fn version_info(&self) -> Result<VersionInfo, ResolveError>;
}

pub struct DefaultVersionServiceArgs {
    /// The configuration the version information is built from.
    pub config: VersionConfig,

    /// The build metadata.
    pub metadata: MetadataCache,
}

pub struct DefaultVersionService {
    config: VersionConfig,
    metadata: MetadataCache,
}

impl DefaultVersionService {
    pub fn new(args: DefaultVersionServiceArgs) -> Self {
        let DefaultVersionServiceArgs { config, metadata } = args;
        Self { config, metadata }
    }
}

impl VersionService for DefaultVersionService {
    fn version_info(&self) -> Result<VersionInfo, ResolveError> {
        info!("Fetching version information");
        let version_info = resolve(&self.config, self.metadata.get(), Utc::now())?;
        debug!("Version info created: {version_info:?}");
        Ok(version_info)
    }
}
