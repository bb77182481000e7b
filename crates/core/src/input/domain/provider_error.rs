use thiserror::Error;

/// Failures that stop an input provider from starting.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("input device unavailable ({device}): {reason}")]
    DeviceUnavailable { device: String, reason: String },
    #[error("failed to load face landmark model: {0}")]
    ModelLoadFailed(String),
    #[error("unknown input provider '{0}' (expected one of: mediapipe_face, keyboard)")]
    UnknownProvider(String),
}
