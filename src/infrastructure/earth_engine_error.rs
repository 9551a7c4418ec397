// Failures talking to the Earth Engine REST API
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EarthEngineError {
    #[error("Request to Earth Engine failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("Failed to sign service account assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    /// Error payload returned by the API itself; the message is passed through unchanged
    #[error("{message}")]
    Api { message: String },

    #[error("Unexpected Earth Engine response: {0}")]
    MalformedResponse(String),
}
