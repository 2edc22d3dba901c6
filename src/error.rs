use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Model API error: {0}")]
    Api(String),

    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),

    #[error("Render command not found: {0}")]
    RenderBinaryNotFound(String),

    #[error("Render failed with exit code {code}: {stderr}")]
    RenderFailed { code: i32, stderr: String },

    #[error("No rendered video found under {0}")]
    ArtifactNotFound(std::path::PathBuf),

    #[error("Invalid batch file: {0}")]
    InvalidBatch(String),

    #[error("No home directory")]
    NoHomeDir,
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
