use crate::camera::domain::frame_source::{CameraConfig, FrameSource};
use crate::detection::domain::face_metrics::FaceMetrics;
use crate::detection::domain::landmark_detector::{DetectorLoader, LandmarkDetector};
use crate::input::domain::provider_error::ProviderError;

/// Outcome of one camera read.
#[derive(Clone, Debug, PartialEq)]
pub enum Sample {
    /// Frame read and discarded by frame skipping.
    Skipped,
    /// No frame, or the detector failed on it.
    Unavailable,
    NoFace,
    Face(FaceMetrics),
}

/// Counters reported when the sampler closes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplerStats {
    pub frames: u64,
    pub inferences: u64,
    pub faces: u64,
    pub errors: u64,
}

/// Camera plus landmark model: reads a frame and reduces it to metrics.
pub struct FaceSampler {
    source: Box<dyn FrameSource>,
    loader: Box<dyn DetectorLoader>,
    detector: Option<Box<dyn LandmarkDetector>>,
    frame_skip: u32,
    stats: SamplerStats,
    last_error: Option<String>,
}

impl FaceSampler {
    pub fn new(
        source: Box<dyn FrameSource>,
        loader: Box<dyn DetectorLoader>,
        frame_skip: u32,
    ) -> Self {
        Self {
            source,
            loader,
            detector: None,
            frame_skip,
            stats: SamplerStats::default(),
            last_error: None,
        }
    }

    /// Open the camera, then load the model. If the model fails the camera
    /// is closed again before returning.
    pub fn open(&mut self, camera: &CameraConfig) -> Result<(), ProviderError> {
        self.source
            .open(camera)
            .map_err(|e| ProviderError::DeviceUnavailable {
                device: camera.describe(),
                reason: e.to_string(),
            })?;

        match self.loader.load() {
            Ok(detector) => {
                self.detector = Some(detector);
                self.stats = SamplerStats::default();
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                self.source.close();
                Err(ProviderError::ModelLoadFailed(e.to_string()))
            }
        }
    }

    pub fn sample(&mut self) -> Sample {
        let Some(detector) = self.detector.as_mut() else {
            return Sample::Unavailable;
        };

        let frame = match self.source.read() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Sample::Unavailable,
            Err(e) => {
                self.stats.errors += 1;
                report(&mut self.last_error, "Camera read failed", &*e);
                return Sample::Unavailable;
            }
        };

        self.stats.frames += 1;
        if (self.stats.frames - 1) % (u64::from(self.frame_skip) + 1) != 0 {
            return Sample::Skipped;
        }

        self.stats.inferences += 1;
        match detector.detect(&frame) {
            Ok(Some(observation)) => {
                self.last_error = None;
                self.stats.faces += 1;
                Sample::Face(FaceMetrics::from_observation(&observation))
            }
            Ok(None) => {
                self.last_error = None;
                Sample::NoFace
            }
            Err(e) => {
                self.stats.errors += 1;
                report(&mut self.last_error, "Face detection failed", &*e);
                Sample::Unavailable
            }
        }
    }

    /// Read until one frame has been through the model, giving up after
    /// `attempts` reads. Returns `Face`, `NoFace` or `Unavailable`.
    pub fn probe(&mut self, attempts: u32) -> Sample {
        for _ in 0..attempts {
            match self.sample() {
                Sample::Skipped | Sample::Unavailable => continue,
                sample => return sample,
            }
        }
        Sample::Unavailable
    }

    pub fn stats(&self) -> SamplerStats {
        self.stats
    }

    /// Release camera and model. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.detector.take().is_some() {
            let s = self.stats;
            log::info!(
                "Face sampler closed: {} frames, {} inferences, {} faces, {} errors",
                s.frames,
                s.inferences,
                s.faces,
                s.errors
            );
        }
        self.source.close();
    }

    pub fn is_open(&self) -> bool {
        self.detector.is_some() && self.source.is_open()
    }
}

/// Log an error unless it repeats the previous one.
fn report(last: &mut Option<String>, context: &str, error: &dyn std::error::Error) {
    let message = error.to_string();
    if last.as_deref() != Some(message.as_str()) {
        log::warn!("{context}: {message}");
        *last = Some(message);
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::detection::domain::face_landmarks::fixtures::neutral_face;
    use crate::detection::domain::face_observation::FaceObservation;
    use crate::shared::frame::Frame;

    use super::*;

    pub type Script = Arc<Mutex<VecDeque<Result<Option<FaceObservation>, String>>>>;

    /// Camera that always has a tiny frame ready.
    pub struct FakeCamera {
        pub open: Arc<AtomicBool>,
        pub fail_open: bool,
    }

    impl FrameSource for FakeCamera {
        fn open(&mut self, _config: &CameraConfig) -> Result<(), Box<dyn std::error::Error>> {
            if self.fail_open {
                return Err("no such device".into());
            }
            self.open.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            Ok(Some(Frame::new(vec![0; 3], 1, 1, 0)))
        }

        fn close(&mut self) {
            self.open.store(false, Ordering::SeqCst);
        }

        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }
    }

    /// Pops one scripted result per call; an empty script means no face.
    pub struct ScriptedDetector {
        pub script: Script,
    }

    impl LandmarkDetector for ScriptedDetector {
        fn detect(
            &mut self,
            _frame: &Frame,
        ) -> Result<Option<FaceObservation>, Box<dyn std::error::Error>> {
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(obs)) => Ok(obs),
                Some(Err(msg)) => Err(msg.into()),
                None => Ok(None),
            }
        }
    }

    pub fn face_with(blendshapes: &[(&str, f64)]) -> FaceObservation {
        blendshapes
            .iter()
            .fold(FaceObservation::new(neutral_face()), |obs, (name, score)| {
                obs.with_blendshape(name, *score)
            })
    }

    pub struct Rig {
        pub camera_open: Arc<AtomicBool>,
        pub script: Script,
    }

    impl Rig {
        pub fn new() -> Self {
            Self {
                camera_open: Arc::new(AtomicBool::new(false)),
                script: Arc::new(Mutex::new(VecDeque::new())),
            }
        }

        pub fn push(&self, result: Result<Option<FaceObservation>, String>) {
            self.script.lock().unwrap().push_back(result);
        }

        pub fn sampler(&self, frame_skip: u32, model_ok: bool) -> FaceSampler {
            let script = self.script.clone();
            let loader = move || -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> {
                if !model_ok {
                    return Err("model file is corrupt".into());
                }
                Ok(Box::new(ScriptedDetector {
                    script: script.clone(),
                }))
            };
            FaceSampler::new(
                Box::new(FakeCamera {
                    open: self.camera_open.clone(),
                    fail_open: false,
                }),
                Box::new(loader),
                frame_skip,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::fakes::*;
    use super::*;
    use crate::input::domain::input_provider::fakes::test_config;

    #[test]
    fn test_face_sample_carries_metrics() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(0, true);
        sampler.open(&test_config().camera).unwrap();
        rig.push(Ok(Some(face_with(&[("jawOpen", 0.8)]))));

        let Sample::Face(metrics) = sampler.sample() else {
            panic!("expected a face sample");
        };
        assert_eq!(metrics.mouth_openness, Some(0.8));
    }

    #[test]
    fn test_no_face_sample() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(0, true);
        sampler.open(&test_config().camera).unwrap();
        assert_eq!(sampler.sample(), Sample::NoFace);
    }

    #[test]
    fn test_frame_skip_runs_detector_on_every_nth_frame() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(2, true);
        sampler.open(&test_config().camera).unwrap();

        let samples: Vec<Sample> = (0..6).map(|_| sampler.sample()).collect();
        assert_eq!(
            samples,
            vec![
                Sample::NoFace,
                Sample::Skipped,
                Sample::Skipped,
                Sample::NoFace,
                Sample::Skipped,
                Sample::Skipped,
            ]
        );
        assert_eq!(sampler.stats().frames, 6);
        assert_eq!(sampler.stats().inferences, 2);
    }

    #[test]
    fn test_detector_error_is_not_fatal() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(0, true);
        sampler.open(&test_config().camera).unwrap();
        rig.push(Err("inference failed".into()));
        rig.push(Err("inference failed".into()));

        assert_eq!(sampler.sample(), Sample::Unavailable);
        assert_eq!(sampler.sample(), Sample::Unavailable);
        assert_eq!(sampler.sample(), Sample::NoFace);
        assert_eq!(sampler.stats().errors, 2);
    }

    #[test]
    fn test_model_failure_closes_camera() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(0, false);

        let err = sampler.open(&test_config().camera).unwrap_err();

        assert!(matches!(err, ProviderError::ModelLoadFailed(ref m) if m.contains("corrupt")));
        assert!(!rig.camera_open.load(Ordering::SeqCst));
        assert!(!sampler.is_open());
    }

    #[test]
    fn test_camera_failure_is_device_unavailable() {
        let mut sampler = FaceSampler::new(
            Box::new(FakeCamera {
                open: Default::default(),
                fail_open: true,
            }),
            Box::new(|| -> Result<Box<dyn LandmarkDetector>, Box<dyn std::error::Error>> {
                panic!("model must not load without a camera")
            }),
            0,
        );

        let err = sampler.open(&test_config().camera).unwrap_err();
        assert!(matches!(err, ProviderError::DeviceUnavailable { .. }));
    }

    #[test]
    fn test_probe_skips_unreadable_frames() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(0, true);
        sampler.open(&test_config().camera).unwrap();
        rig.push(Err("warming up".into()));
        rig.push(Ok(Some(face_with(&[("eyeBlinkLeft", 0.3)]))));

        assert!(matches!(sampler.probe(5), Sample::Face(_)));
        assert_eq!(sampler.stats().inferences, 2);
    }

    #[test]
    fn test_probe_gives_up() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(0, true);
        sampler.open(&test_config().camera).unwrap();
        for _ in 0..3 {
            rig.push(Err("no signal".into()));
        }

        assert_eq!(sampler.probe(3), Sample::Unavailable);
    }

    #[test]
    fn test_close_is_idempotent() {
        let rig = Rig::new();
        let mut sampler = rig.sampler(0, true);
        sampler.open(&test_config().camera).unwrap();
        assert!(sampler.is_open());

        sampler.close();
        sampler.close();

        assert!(!rig.camera_open.load(Ordering::SeqCst));
        assert_eq!(sampler.sample(), Sample::Unavailable);
    }
}
