use std::io;
use thiserror::Error;

/// Why a memory snapshot could not be taken.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("couldn't get memory statistics, host_statistics returned {0}")]
    KernelQuery(i32),
    #[error("sysctl {key} failed: {source}")]
    ConfigQuery {
        key: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("memory statistics are only available on macOS")]
    Unsupported,
}

/// Problems reading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
