use crate::properties::parse_properties;
use once_cell::sync::OnceCell;
use std::{collections::HashMap, fs, io, path::PathBuf};
use tracing::{debug, error, info, warn};

/// The abbreviated hash of the commit.
pub const COMMIT_HASH_KEY: &str = "commit.id.abbrev";

/// The time of the commit.
pub const COMMIT_TIME_KEY: &str = "commit.time";

/// The branch the commit belongs to.
pub const BRANCH_KEY: &str = "branch";

const RECOGNIZED_KEYS: [&str; 3] = [COMMIT_HASH_KEY, COMMIT_TIME_KEY, BRANCH_KEY];

// Keys in files generated by git tooling are namespaced under this prefix.
const GIT_KEY_PREFIX: &str = "git.";

const EMBEDDED_GIT_PROPERTIES: &str = include_str!(concat!(env!("OUT_DIR"), "/git.properties"));

/// Metadata about the commit a service was built from.
///
/// Only the recognized keys are kept, any others are dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildMetadata(HashMap<String, String>);

impl BuildMetadata {
    /// Parse metadata out of a properties file.
    pub fn parse(input: &str) -> Self {
        parse_properties(input).into_iter().collect()
    }

    /// Get the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for BuildMetadata
where
    K: Into<String>,
    V: Into<String>,
{
    /// Keys are accepted with or without the `git.` prefix. When both forms of a key are present, the prefixed
    /// one wins regardless of order.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut prefixed: HashMap<String, String> = HashMap::new();
        let mut unprefixed = HashMap::new();
        for (key, value) in iter {
            let key: String = key.into();
            let (entries, key) = match key.strip_prefix(GIT_KEY_PREFIX) {
                Some(stripped) => (&mut prefixed, stripped.to_string()),
                None => (&mut unprefixed, key),
            };
            if RECOGNIZED_KEYS.contains(&key.as_str()) {
                entries.insert(key, value.into());
            }
        }
        unprefixed.extend(prefixed);
        Self(unprefixed)
    }
}

/// A source of build metadata.
#[cfg_attr(test, mockall::automock)]
pub trait MetadataSource: Send + Sync {
    /// Read the raw metadata, returning `None` if this source doesn't exist.
    fn read(&self) -> io::Result<Option<String>>;

    /// Describe this source, for logging purposes.
    fn describe(&self) -> String;
}

/// The metadata generated from the git checkout when this binary was built.
pub struct EmbeddedMetadataSource;

impl MetadataSource for EmbeddedMetadataSource {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(Some(EMBEDDED_GIT_PROPERTIES.to_string()))
    }

    fn describe(&self) -> String {
        "embedded git properties".into()
    }
}

/// Metadata stored in a properties file.
pub struct FileMetadataSource {
    path: PathBuf,
}

impl FileMetadataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MetadataSource for FileMetadataSource {
    fn read(&self) -> io::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path).map(Some)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Load the metadata out of a source.
///
/// This never fails: a missing source or a read error both result in empty metadata.
pub fn load_metadata(source: &dyn MetadataSource) -> BuildMetadata {
    let description = source.describe();
    match source.read() {
        Ok(Some(contents)) => {
            let metadata = BuildMetadata::parse(&contents);
            debug!("Loaded {} build metadata entries from {description}", metadata.len());
            metadata
        }
        Ok(None) => {
            warn!("Build metadata not found in {description}");
            BuildMetadata::default()
        }
        Err(e) => {
            error!("Failed to read build metadata from {description}: {e}");
            BuildMetadata::default()
        }
    }
}

/// Holds the metadata for a source, loading it the first time it's requested.
pub struct MetadataCache {
    source: Box<dyn MetadataSource>,
    metadata: OnceCell<BuildMetadata>,
}

impl MetadataCache {
    pub fn new(source: Box<dyn MetadataSource>) -> Self {
        Self { source, metadata: OnceCell::new() }
    }

    /// Get the metadata, loading it if this is the first call.
    ///
    /// Concurrent first callers block until the single load completes.
    pub fn get(&self) -> &BuildMetadata {
        self.metadata.get_or_init(|| {
            info!("Loading build metadata from {}", self.source.describe());
            load_metadata(self.source.as_ref())
        })
    }
}
