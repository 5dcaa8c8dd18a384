//! Default values for bomcheck configuration.

/// Versions must end with `-redhat-<digits>`.
pub const DEFAULT_RELEASE_MARKER: &str = "-redhat-[0-9]+$";

/// JBoss Developer Framework stacks file listing the supported BOMs.
pub const DEFAULT_CATALOG_SOURCE: &str =
    "https://raw.github.com/jboss-jdf/jdf-stack/1.0.0.Final/stacks.yaml";

/// Remote repositories consulted after the local repository.
pub const DEFAULT_REMOTE_REPOSITORIES: &[&str] = &[
    "https://maven.repository.redhat.com/ga",
    "https://repo.maven.apache.org/maven2",
];

/// Remote request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Retries after the first failed remote attempt.
pub const DEFAULT_MAX_RETRIES: u8 = 2;

/// Cached descriptors are reused for a day.
pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;
