/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid synthesis endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

/// Errors raised while acquiring or running a capture device
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Microphone permission denied")]
    PermissionDenied,

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture result arrived for an item that is no longer active")]
    Stale,
}

/// Errors raised while fetching or decoding audio
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("Audio source is not ready yet")]
    Pending,

    #[error("Failed to fetch audio from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Failed to decode audio: {0}")]
    Decode(String),
}
