use std::path::PathBuf;

use crate::camera::domain::frame_source::CameraConfig;

use super::expression_mapper::Thresholds;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelConfig {
    pub path: Option<PathBuf>,
    pub url: Option<String>,
}

/// Everything a provider needs to start. Built from `Settings` plus CLI
/// overrides.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderConfig {
    pub camera: CameraConfig,
    pub model: ModelConfig,
    pub thresholds: Thresholds,
    /// Run inference on every `frame_skip + 1`-th frame.
    pub frame_skip: u32,
    /// Set when the camera already delivers a mirrored image.
    pub mirror: bool,
    pub threaded_inference: bool,
}
