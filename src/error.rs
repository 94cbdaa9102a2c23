//! Error types for the archiver.
//!
//! Most remote failures never become an [`Error`]: a missing listing or post
//! detail is logged and skipped, and asset downloads are retried. What is left
//! here ends the run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required setting: {0}")]
    MissingConfig(String),

    #[error("FANBOX request failed: {0}")]
    Api(String),

    #[error("Post {post_id} has an unexpected shape: {message}")]
    Payload { post_id: String, message: String },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Gave up on {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32 },

    #[error("Refusing unsafe path component: {0}")]
    InvalidFilename(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed config file: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_)
            | Error::ConfigValidation { .. }
            | Error::MissingConfig(_)
            | Error::TomlParse(_) => exit_codes::CONFIG_ERROR,
            Error::Api(_) | Error::Payload { .. } => exit_codes::API_ERROR,
            Error::Download(_) | Error::RetriesExhausted { .. } => exit_codes::DOWNLOAD_ERROR,
            _ => exit_codes::UNEXPECTED_ERROR,
        }
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const API_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::RetriesExhausted {
            url: "https://downloads.fanbox.cc/a.png".into(),
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "Gave up on https://downloads.fanbox.cc/a.png after 3 attempts"
        );

        let err = Error::Payload {
            post_id: "42".into(),
            message: "missing field `type`".into(),
        };
        assert!(err.to_string().starts_with("Post 42"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::MissingConfig("x".into()).exit_code(), exit_codes::CONFIG_ERROR);
        assert_eq!(Error::Api("x".into()).exit_code(), exit_codes::API_ERROR);
        assert_eq!(Error::Download("x".into()).exit_code(), exit_codes::DOWNLOAD_ERROR);
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(Error::from(io).exit_code(), exit_codes::UNEXPECTED_ERROR);
    }
}
