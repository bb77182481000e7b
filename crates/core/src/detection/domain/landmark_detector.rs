use crate::shared::frame::Frame;

use super::face_observation::FaceObservation;

/// Domain interface for facial landmark inference.
///
/// `Ok(None)` means the frame contains no face, which is a normal result.
pub trait LandmarkDetector: Send {
    fn detect(
        &mut self,
        frame: &Frame,
    ) -> Result<Option<FaceObservation>, Box<dyn std::error::Error>>;
}

/// Deferred construction of a detector, so model loading happens when a
/// provider starts rather than when it is configured.
pub trait DetectorLoader: Send {
    fn load(&self) -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>>;
}

impl<F> DetectorLoader for F
where
    F: Fn() -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> + Send,
{
    fn load(&self) -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> {
        self()
    }
}
