// src/error.rs
// =============================================================================
// The error taxonomy for a run.
//
// Every failure falls into one of four classes, and each class maps to its
// own process exit code so that CI jobs can tell them apart:
// - Network:  we never got an HTTP response (connect failure, timeout, ...)
// - Upstream: we got a response, but not one we can use (bad status for a
//             required resource, malformed JSON, missing required field)
// - Config:   the configuration is incomplete or inconsistent
// - Io:       reading the config file or writing the output file failed
// =============================================================================

use thiserror::Error;

/// Exit code when every repository was fetched and the file was written.
pub const EXIT_OK: i32 = 0;
/// Exit code when the file was written but some rows are placeholders.
pub const EXIT_PARTIAL: i32 = 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {url}: {reason}")]
    Upstream { url: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn upstream(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Upstream {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            source,
        }
    }

    /// Only transport failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Network { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,
            Error::Network { .. } => 3,
            Error::Upstream { .. } => 4,
            Error::Io { .. } => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
