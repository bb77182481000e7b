use std::collections::HashMap;

use super::face_landmarks::FaceLandmarks;

/// Everything the landmark model reports about one detected face.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceObservation {
    pub landmarks: FaceLandmarks,
    /// Expression coefficients keyed by lowercased name (`jawopen`,
    /// `eyeblinkleft`, ...). Empty when the model has no blendshape head.
    blendshapes: HashMap<String, f64>,
}

impl FaceObservation {
    pub fn new(landmarks: FaceLandmarks) -> Self {
        Self {
            landmarks,
            blendshapes: HashMap::new(),
        }
    }

    pub fn with_blendshape(mut self, name: &str, score: f64) -> Self {
        self.blendshapes.insert(name.to_lowercase(), score);
        self
    }

    /// Case-insensitive blendshape lookup.
    pub fn blendshape(&self, name: &str) -> Option<f64> {
        self.blendshapes.get(&name.to_lowercase()).copied()
    }
}
