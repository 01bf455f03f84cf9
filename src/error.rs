//! Error kinds raised while harvesting headlines.
//!
//! Every per-source failure is one of [`HarvestError::Fetch`],
//! [`HarvestError::Parse`] or [`HarvestError::Sink`] and is caught by the
//! runner at the source boundary. [`HarvestError::Config`] is the only kind
//! that stops a run, and it is raised before the first source is touched.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("fetch of {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("could not parse document: {message}")]
    Parse { message: String },

    #[error("sink '{destination}' failed: {message}")]
    Sink {
        destination: String,
        message: String,
    },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarvestError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn sink(destination: impl Into<String>, message: impl ToString) -> Self {
        Self::Sink {
            destination: destination.into(),
            message: message.to_string(),
        }
    }

    pub fn fetch(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Short label for status lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } => "parse",
            Self::Sink { .. } | Self::Io(_) => "sink",
            Self::Config { .. } | Self::Yaml(_) => "config",
            Self::Json(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
