//! MediaPipe face mesh (468 points) running under ONNX Runtime.
//!
//! The model is fed the largest centered square of the frame. It expects a
//! roughly centered face filling most of that crop, which holds for a player
//! sitting in front of a webcam, so no separate face detection stage runs.

use std::path::Path;

use ndarray::Array4;

use crate::detection::domain::face_landmarks::{FaceLandmarks, Landmark};
use crate::detection::domain::face_observation::FaceObservation;
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::shared::constants::FACE_PRESENCE_THRESHOLD;
use crate::shared::frame::Frame;

use super::execution_provider::{platform_execution_label, platform_execution_providers};

const DEFAULT_INPUT_SIZE: usize = 192;

const MESH_POINTS: usize = 468;

/// Values per mesh point (x, y, z).
const MESH_STRIDE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Layout {
    Nchw,
    Nhwc,
}

pub struct OnnxFaceMeshDetector {
    session: ort::session::Session,
    input_size: usize,
    layout: Layout,
    presence_threshold: f64,
}

impl OnnxFaceMeshDetector {
    /// Load the model. Input size and channel layout are read from the
    /// model's first input, falling back to 192x192 NHWC.
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_execution_providers(platform_execution_providers())?
            .commit_from_file(model_path)?;

        let (input_size, layout) = session
            .inputs()
            .first()
            .and_then(|input| {
                if let ort::value::ValueType::Tensor { ref shape, .. } = input.dtype() {
                    input_geometry(&shape[..])
                } else {
                    None
                }
            })
            .unwrap_or((DEFAULT_INPUT_SIZE, Layout::Nhwc));

        log::info!(
            "Loaded face mesh model {} ({input_size}x{input_size}, {layout:?}, {})",
            model_path.display(),
            platform_execution_label()
        );

        Ok(Self {
            session,
            input_size,
            layout,
            presence_threshold: FACE_PRESENCE_THRESHOLD,
        })
    }
}

impl LandmarkDetector for OnnxFaceMeshDetector {
    fn detect(
        &mut self,
        frame: &Frame,
    ) -> Result<Option<FaceObservation>, Box<dyn std::error::Error>> {
        let crop = frame.center_square();
        let tensor = preprocess(frame, crop, self.input_size, self.layout);

        let input_value = ort::value::Tensor::from_array(tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        let mut mesh: Option<Vec<f32>> = None;
        let mut presence: Option<f32> = None;
        for i in 0..outputs.len() {
            let array = outputs[i].try_extract_array::<f32>()?;
            let values = array.iter().copied().collect::<Vec<_>>();
            match values.len() {
                n if n == MESH_POINTS * MESH_STRIDE => mesh = Some(values),
                1 => presence = Some(values[0]),
                _ => {}
            }
        }

        let mesh = mesh.ok_or("face mesh model produced no 468x3 landmark output")?;
        if let Some(logit) = presence {
            if (sigmoid(logit) as f64) < self.presence_threshold {
                return Ok(None);
            }
        }

        Ok(Some(FaceObservation::new(mesh_to_landmarks(
            &mesh,
            crop,
            self.input_size,
        ))))
    }
}

/// `(side, layout)` for a `[1, 3, S, S]` or `[1, S, S, 3]` input shape.
fn input_geometry(shape: &[i64]) -> Option<(usize, Layout)> {
    if shape.len() != 4 {
        return None;
    }
    if shape[1] == 3 && shape[2] > 0 {
        Some((shape[2] as usize, Layout::Nchw))
    } else if shape[3] == 3 && shape[1] > 0 {
        Some((shape[1] as usize, Layout::Nhwc))
    } else {
        None
    }
}

/// Nearest-neighbour resize of the crop to `size x size`, scaled to [0,1].
fn preprocess(frame: &Frame, crop: (u32, u32, u32), size: usize, layout: Layout) -> Array4<f32> {
    let src = frame.as_ndarray();
    let (cx, cy, side) = (crop.0 as usize, crop.1 as usize, crop.2 as usize);
    let mut tensor = match layout {
        Layout::Nchw => Array4::<f32>::zeros((1, 3, size, size)),
        Layout::Nhwc => Array4::<f32>::zeros((1, size, size, 3)),
    };

    for y in 0..size {
        let src_y = cy + (((y as f64 + 0.5) * side as f64 / size as f64) as usize).min(side - 1);
        for x in 0..size {
            let src_x =
                cx + (((x as f64 + 0.5) * side as f64 / size as f64) as usize).min(side - 1);
            for c in 0..3 {
                let v = src[[src_y, src_x, c]] as f32 / 255.0;
                match layout {
                    Layout::Nchw => tensor[[0, c, y, x]] = v,
                    Layout::Nhwc => tensor[[0, y, x, c]] = v,
                }
            }
        }
    }
    tensor
}

/// Mesh vertex used for each named landmark.
fn mesh_index(landmark: Landmark) -> usize {
    match landmark {
        Landmark::LeftEyeOuter => 33,
        Landmark::LeftEyeInner => 133,
        Landmark::LeftEyeUpper => 159,
        Landmark::LeftEyeLower => 145,
        Landmark::RightEyeInner => 362,
        Landmark::RightEyeOuter => 263,
        Landmark::RightEyeUpper => 386,
        Landmark::RightEyeLower => 374,
        Landmark::NoseTip => 1,
        Landmark::UpperLipInner => 13,
        Landmark::LowerLipInner => 14,
        Landmark::MouthLeft => 61,
        Landmark::MouthRight => 291,
    }
}

/// Map model-space mesh coordinates back into frame pixels.
fn mesh_to_landmarks(mesh: &[f32], crop: (u32, u32, u32), input_size: usize) -> FaceLandmarks {
    let scale = crop.2 as f64 / input_size as f64;
    FaceLandmarks::from_fn(|landmark| {
        let base = mesh_index(landmark) * MESH_STRIDE;
        (
            crop.0 as f64 + mesh[base] as f64 * scale,
            crop.1 as f64 + mesh[base + 1] as f64 * scale,
        )
    })
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(vec![1, 3, 192, 192], Some((192, Layout::Nchw)))]
    #[case(vec![1, 256, 256, 3], Some((256, Layout::Nhwc)))]
    #[case(vec![1, 3, -1, -1], None)]
    #[case(vec![1, 1404], None)]
    fn test_input_geometry(#[case] shape: Vec<i64>, #[case] expected: Option<(usize, Layout)>) {
        assert_eq!(input_geometry(&shape), expected);
    }

    #[test]
    fn test_preprocess_crops_center_square() {
        // 4x2 frame: left and right columns red, middle two green.
        let mut data = Vec::new();
        for _row in 0..2 {
            for col in 0..4 {
                if col == 0 || col == 3 {
                    data.extend_from_slice(&[255, 0, 0]);
                } else {
                    data.extend_from_slice(&[0, 255, 0]);
                }
            }
        }
        let frame = Frame::new(data, 4, 2, 0);
        let crop = frame.center_square();
        assert_eq!(crop, (1, 0, 2));

        let tensor = preprocess(&frame, crop, 4, Layout::Nchw);
        assert_eq!(tensor.shape(), &[1, 3, 4, 4]);
        assert!(tensor.slice(ndarray::s![0, 0, .., ..]).iter().all(|&v| v == 0.0));
        assert!(tensor.slice(ndarray::s![0, 1, .., ..]).iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_preprocess_nhwc_layout() {
        let frame = Frame::new(vec![51; 2 * 2 * 3], 2, 2, 0);
        let tensor = preprocess(&frame, frame.center_square(), 3, Layout::Nhwc);
        assert_eq!(tensor.shape(), &[1, 3, 3, 3]);
        assert_relative_eq!(tensor[[0, 2, 1, 0]], 0.2);
    }

    #[test]
    fn test_mesh_coordinates_scaled_into_frame() {
        let mut mesh = vec![0.0f32; MESH_POINTS * MESH_STRIDE];
        let nose = mesh_index(Landmark::NoseTip) * MESH_STRIDE;
        mesh[nose] = 96.0;
        mesh[nose + 1] = 48.0;

        // 240px square crop starting at x=40 fed at 192px.
        let landmarks = mesh_to_landmarks(&mesh, (40, 0, 240), 192);
        let (x, y) = landmarks.point(Landmark::NoseTip);
        assert_relative_eq!(x, 40.0 + 120.0);
        assert_relative_eq!(y, 60.0);
    }

    #[test]
    fn test_mesh_indices_are_in_range_and_distinct() {
        let mut seen: Vec<usize> = Landmark::ALL.iter().map(|&lm| mesh_index(lm)).collect();
        assert!(seen.iter().all(|&i| i < MESH_POINTS));
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), Landmark::COUNT);
    }

    #[test]
    fn test_sigmoid() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-8.0) < 0.01);
        assert!(sigmoid(8.0) > 0.99);
    }
}
