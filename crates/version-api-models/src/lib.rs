use serde::{Deserialize, Serialize};

pub mod health {
    /// The body returned by the health endpoint.
    pub const HEALTH_OK: &str = "OK";
}

pub mod version {
    use super::*;

    /// The value used for any piece of build metadata that isn't available.
    pub const UNKNOWN: &str = "unknown";

    /// The version information for a running service.
    #[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
    pub struct VersionInfo {
        /// The configured version, e.g. `1.0.0-dev`.
        pub version: String,

        /// The environment this service runs in.
        pub environment: String,

        /// The abbreviated hash of the commit the service was built from.
        pub commit_hash: String,

        /// The time of the commit the service was built from.
        pub commit_time: String,

        /// The branch the service was built from.
        pub branch: String,

        /// The time at which this information was produced, in RFC 3339 format.
        pub build_time: String,

        /// The application name.
        pub application_name: String,
    }
}
