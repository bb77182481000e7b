use crate::input::domain::expression_mapper::ExpressionMapper;
use crate::input::domain::input_event::{InputEvent, InputKind, ProviderKind};
use crate::input::domain::input_provider::InputProvider;
use crate::input::domain::key_state::{Key, KeyState};
use crate::input::domain::provider_config::ProviderConfig;
use crate::input::domain::provider_error::ProviderError;

use super::background_inference::InferenceWorker;
use super::face_sampler::{FaceSampler, Sample};

/// Builds an unopened sampler for a configuration.
pub type SamplerBuilder = Box<dyn Fn(&ProviderConfig) -> FaceSampler + Send>;

enum Engine {
    Idle,
    Inline(FaceSampler),
    Background(InferenceWorker),
}

/// Webcam expressions mapped to game input.
///
/// While no face is visible every trigger keeps its last state and nothing
/// is emitted, so a face lost mid-blink does not produce a release without
/// the eyes actually opening. Escape on the keyboard still quits.
pub struct FaceProvider {
    build: SamplerBuilder,
    engine: Engine,
    mapper: Option<ExpressionMapper>,
    escape_held: bool,
}

impl FaceProvider {
    pub fn new(build: SamplerBuilder) -> Self {
        Self {
            build,
            engine: Engine::Idle,
            mapper: None,
            escape_held: false,
        }
    }

    fn next_sample(&mut self) -> Option<Sample> {
        match &mut self.engine {
            Engine::Idle => None,
            Engine::Inline(sampler) => Some(sampler.sample()),
            Engine::Background(worker) => worker.latest(),
        }
    }
}

impl InputProvider for FaceProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::MediapipeFace
    }

    fn initialize(&mut self, config: &ProviderConfig) -> Result<(), ProviderError> {
        self.shutdown();

        let mut sampler = (self.build)(config);
        sampler.open(&config.camera)?;

        self.engine = if config.threaded_inference {
            Engine::Background(InferenceWorker::spawn(sampler)?)
        } else {
            Engine::Inline(sampler)
        };
        self.mapper = Some(ExpressionMapper::new(&config.thresholds, config.mirror));
        self.escape_held = false;
        Ok(())
    }

    fn settle(&mut self, keys: &KeyState) {
        self.escape_held = keys.is_held(Key::Escape);
    }

    fn poll(&mut self, keys: &KeyState) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if matches!(self.engine, Engine::Idle) {
            return events;
        }

        let escape = keys.is_held(Key::Escape);
        if escape && !self.escape_held {
            events.push(InputEvent::new(InputKind::Quit, ProviderKind::MediapipeFace));
        }
        self.escape_held = escape;

        if let Some(Sample::Face(metrics)) = self.next_sample() {
            if let Some(mapper) = self.mapper.as_mut() {
                events.extend(mapper.map(&metrics));
            }
        }
        events
    }

    fn shutdown(&mut self) {
        match std::mem::replace(&mut self.engine, Engine::Idle) {
            Engine::Idle => {}
            Engine::Inline(mut sampler) => sampler.close(),
            Engine::Background(mut worker) => {
                if let Some(mut sampler) = worker.stop() {
                    sampler.close();
                }
            }
        }
        self.mapper = None;
    }

    fn is_active(&self) -> bool {
        !matches!(self.engine, Engine::Idle)
    }
}

impl Drop for FaceProvider {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::super::face_sampler::fakes::{face_with, Rig};
    use super::*;
    use crate::input::domain::input_event::Button;
    use crate::input::domain::input_provider::fakes::test_config;

    fn provider(rig: &Arc<Rig>, model_ok: bool) -> FaceProvider {
        let rig = rig.clone();
        FaceProvider::new(Box::new(move |config: &ProviderConfig| {
            rig.sampler(config.frame_skip, model_ok)
        }))
    }

    fn kinds(events: Vec<InputEvent>) -> Vec<InputKind> {
        events.into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_open_mouth_sequence_presses_once() {
        let rig = Arc::new(Rig::new());
        let mut provider = provider(&rig, true);
        provider.initialize(&test_config()).unwrap();

        for _ in 0..5 {
            rig.push(Ok(Some(face_with(&[("jawOpen", 0.9)]))));
        }
        rig.push(Ok(Some(face_with(&[("jawOpen", 0.0)]))));

        let events: Vec<InputKind> = (0..6)
            .flat_map(|_| kinds(provider.poll(&KeyState::new())))
            .collect();
        assert_eq!(
            events,
            vec![
                InputKind::ActionPress(Button::Secondary),
                InputKind::ActionRelease(Button::Secondary),
            ]
        );
    }

    #[test]
    fn test_face_loss_holds_state_silently() {
        let rig = Arc::new(Rig::new());
        let mut provider = provider(&rig, true);
        provider.initialize(&test_config()).unwrap();

        rig.push(Ok(Some(face_with(&[("jawOpen", 0.9)]))));
        rig.push(Ok(None));
        rig.push(Ok(None));
        rig.push(Ok(Some(face_with(&[("jawOpen", 0.9)]))));

        let events: Vec<InputKind> = (0..4)
            .flat_map(|_| kinds(provider.poll(&KeyState::new())))
            .collect();
        assert_eq!(events, vec![InputKind::ActionPress(Button::Secondary)]);
    }

    #[test]
    fn test_escape_quits_once_per_press() {
        let rig = Arc::new(Rig::new());
        let mut provider = provider(&rig, true);
        provider.initialize(&test_config()).unwrap();
        let esc = KeyState::from_keys([Key::Escape]);

        assert_eq!(kinds(provider.poll(&esc)), vec![InputKind::Quit]);
        assert!(provider.poll(&esc).is_empty());
    }

    #[test]
    fn test_settle_swallows_escape_already_held() {
        let rig = Arc::new(Rig::new());
        let mut provider = provider(&rig, true);
        provider.initialize(&test_config()).unwrap();
        let esc = KeyState::from_keys([Key::Escape]);

        provider.settle(&esc);
        assert!(provider.poll(&esc).is_empty());
    }

    #[test]
    fn test_model_failure_leaves_camera_closed() {
        let rig = Arc::new(Rig::new());
        let mut provider = provider(&rig, false);

        let err = provider.initialize(&test_config()).unwrap_err();

        assert!(matches!(err, ProviderError::ModelLoadFailed(_)));
        assert!(!provider.is_active());
        assert!(!rig.camera_open.load(Ordering::SeqCst));
    }

    #[test]
    fn test_shutdown_releases_camera_and_is_idempotent() {
        let rig = Arc::new(Rig::new());
        let mut provider = provider(&rig, true);
        provider.initialize(&test_config()).unwrap();
        assert!(rig.camera_open.load(Ordering::SeqCst));

        provider.shutdown();
        provider.shutdown();

        assert!(!provider.is_active());
        assert!(!rig.camera_open.load(Ordering::SeqCst));
        assert!(provider.poll(&KeyState::from_keys([Key::Escape])).is_empty());
    }

    #[test]
    fn test_threaded_inference_releases_camera_on_shutdown() {
        let rig = Arc::new(Rig::new());
        let mut provider = provider(&rig, true);
        let mut config = test_config();
        config.threaded_inference = true;

        provider.initialize(&config).unwrap();
        assert!(provider.is_active());
        provider.shutdown();

        assert!(!rig.camera_open.load(Ordering::SeqCst));
    }
}
