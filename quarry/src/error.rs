use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed response: missing or unexpected `{0}`")]
    MalformedResponse(String),

    #[error("Cannot pluck `{segment}`: element has no such key at either level")]
    Pluck { segment: String },

    #[error("Aggregation '{0}' does not support sub-aggregations")]
    NestingUnsupported(String),

    #[error("Connection not configured: {0}")]
    UnknownConnection(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search failed (status {status}): {body}")]
    Status { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, Error>;
