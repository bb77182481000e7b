//! Scalar expression measurements derived from one face observation.
//!
//! Blendshape scores are preferred when the model provides them; otherwise
//! the landmark geometry is normalized onto the same 0..1 scale.

use super::face_landmarks::Side;
use super::face_observation::FaceObservation;

/// Eye aspect ratio of a comfortably open eye.
const OPEN_EYE_ASPECT: f64 = 0.3;

/// Mouth aspect ratio treated as fully open.
const OPEN_MOUTH_ASPECT: f64 = 0.6;

/// Mouth width ratios of a relaxed mouth and of a full grin.
const RELAXED_MOUTH_WIDTH: f64 = 0.5;
const GRIN_MOUTH_WIDTH: f64 = 0.65;

/// Corner lift of a full grin.
const GRIN_CORNER_LIFT: f64 = 0.15;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FaceMetrics {
    /// 0.0 = eyes wide open, 1.0 = shut.
    pub eye_closure: Option<f64>,
    /// 0.0 = closed, 1.0 = wide open.
    pub mouth_openness: Option<f64>,
    /// 0.0 = relaxed, 1.0 = full grin.
    pub smile: Option<f64>,
    pub roll_degrees: Option<f64>,
    pub pitch_ratio: Option<f64>,
}

impl FaceMetrics {
    pub fn from_observation(obs: &FaceObservation) -> Self {
        Self {
            eye_closure: eye_closure(obs),
            mouth_openness: mouth_openness(obs),
            smile: smile(obs),
            roll_degrees: Some(obs.landmarks.roll_degrees()),
            pitch_ratio: obs.landmarks.pitch_ratio(),
        }
    }
}

/// Stronger of blink and squint, so a squeezed blink still registers.
fn eye_closure(obs: &FaceObservation) -> Option<f64> {
    let blink = pair_mean(obs, "eyeBlinkLeft", "eyeBlinkRight");
    let squint = pair_mean(obs, "eyeSquintLeft", "eyeSquintRight");
    match (blink, squint) {
        (Some(b), Some(s)) => Some(b.max(s)),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => {
            let left = obs.landmarks.eye_aspect_ratio(Side::Left)?;
            let right = obs.landmarks.eye_aspect_ratio(Side::Right)?;
            let ear = (left + right) / 2.0;
            Some((1.0 - ear / OPEN_EYE_ASPECT).clamp(0.0, 1.0))
        }
    }
}

fn mouth_openness(obs: &FaceObservation) -> Option<f64> {
    if let Some(jaw) = obs.blendshape("jawOpen") {
        return Some(jaw);
    }
    if let Some(close) = obs.blendshape("mouthClose") {
        return Some(1.0 - close);
    }
    let mar = obs.landmarks.mouth_aspect_ratio()?;
    Some((mar / OPEN_MOUTH_ASPECT).clamp(0.0, 1.0))
}

/// Without blendshapes, half from corner lift and half from widening.
fn smile(obs: &FaceObservation) -> Option<f64> {
    if let Some(score) = pair_mean(obs, "mouthSmileLeft", "mouthSmileRight") {
        return Some(score);
    }
    let lift = (obs.landmarks.mouth_corner_lift()? / GRIN_CORNER_LIFT).clamp(0.0, 1.0);
    let widen = ((obs.landmarks.mouth_width_ratio()? - RELAXED_MOUTH_WIDTH)
        / (GRIN_MOUTH_WIDTH - RELAXED_MOUTH_WIDTH))
        .clamp(0.0, 1.0);
    Some((lift + widen) / 2.0)
}

fn pair_mean(obs: &FaceObservation, a: &str, b: &str) -> Option<f64> {
    Some((obs.blendshape(a)? + obs.blendshape(b)?) / 2.0)
}
