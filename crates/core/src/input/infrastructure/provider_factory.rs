use std::path::Path;

use crate::camera::infrastructure::ffmpeg_camera::FfmpegCamera;
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::detection::infrastructure::onnx_face_mesh_detector::OnnxFaceMeshDetector;
use crate::input::domain::input_event::ProviderKind;
use crate::input::domain::input_provider::InputProvider;
use crate::input::domain::provider_config::ProviderConfig;
use crate::shared::constants::{BUNDLED_MODEL_DIR, FACE_MESH_MODEL_NAME};
use crate::shared::model_resolver::{self, ModelLookup};

use super::face_provider::FaceProvider;
use super::face_sampler::FaceSampler;
use super::keyboard_provider::KeyboardProvider;

/// Create an uninitialized provider of the given kind.
pub fn create_provider(kind: ProviderKind) -> Box<dyn InputProvider> {
    log::info!("Using input provider '{kind}'");
    match kind {
        ProviderKind::Keyboard => Box::new(KeyboardProvider::new()),
        ProviderKind::MediapipeFace => Box::new(FaceProvider::new(Box::new(create_face_sampler))),
    }
}

/// Webcam sampler whose model is resolved and loaded when it opens.
pub fn create_face_sampler(config: &ProviderConfig) -> FaceSampler {
    let model = config.model.clone();
    let loader = move || -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> {
        let lookup = ModelLookup {
            explicit: model.path.as_deref(),
            bundled_dir: Some(Path::new(BUNDLED_MODEL_DIR)),
            url: model.url.as_deref(),
        };
        let progress: model_resolver::ProgressFn = Box::new(|done, total| {
            if total > 0 {
                log::debug!("Model download {}%", done * 100 / total);
            }
        });
        let path = model_resolver::resolve(FACE_MESH_MODEL_NAME, &lookup, Some(progress))?;
        Ok(Box::new(OnnxFaceMeshDetector::new(&path)?))
    };
    FaceSampler::new(
        Box::new(FfmpegCamera::new()),
        Box::new(loader),
        config.frame_skip,
    )
}
