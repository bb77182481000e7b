use std::ops::{Deref, DerefMut};

use super::input_event::{InputEvent, ProviderKind};
use super::key_state::KeyState;
use super::provider_config::ProviderConfig;
use super::provider_error::ProviderError;

/// A physical input channel that turns observations into [`InputEvent`]s.
///
/// Lifecycle: `initialize` once, `poll` once per frame, `shutdown` to
/// release the device. `shutdown` must be idempotent.
pub trait InputProvider: Send {
    fn kind(&self) -> ProviderKind;

    /// Acquire devices and models. On error nothing stays acquired.
    fn initialize(&mut self, config: &ProviderConfig) -> Result<(), ProviderError>;

    /// Align edge state with keys already held when the provider starts, so
    /// the key that confirmed a menu choice does not also reach the game.
    fn settle(&mut self, _keys: &KeyState) {}

    /// Events observed since the previous poll, in order. Possibly empty.
    fn poll(&mut self, keys: &KeyState) -> Vec<InputEvent>;

    fn shutdown(&mut self);

    /// True while devices are held.
    fn is_active(&self) -> bool;
}

/// Builds fresh, uninitialized providers of the configured kind.
pub trait ProviderFactory {
    fn create(&self) -> Box<dyn InputProvider>;
}

impl<F> ProviderFactory for F
where
    F: Fn() -> Box<dyn InputProvider>,
{
    fn create(&self) -> Box<dyn InputProvider> {
        self()
    }
}

/// Scoped ownership of an initialized provider. Dropping the guard shuts the
/// provider down, whichever way control leaves the scope.
pub struct ProviderGuard {
    provider: Box<dyn InputProvider>,
}

impl ProviderGuard {
    pub fn acquire(
        mut provider: Box<dyn InputProvider>,
        config: &ProviderConfig,
    ) -> Result<Self, ProviderError> {
        if let Err(e) = provider.initialize(config) {
            provider.shutdown();
            return Err(e);
        }
        log::info!("Input provider '{}' started", provider.kind());
        Ok(Self { provider })
    }
}

impl Deref for ProviderGuard {
    type Target = dyn InputProvider;

    fn deref(&self) -> &Self::Target {
        self.provider.as_ref()
    }
}

impl DerefMut for ProviderGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.provider.as_mut()
    }
}

impl Drop for ProviderGuard {
    fn drop(&mut self) {
        self.provider.shutdown();
        log::info!("Input provider '{}' released", self.provider.kind());
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Observable lifecycle of a [`ScriptedProvider`], shared with the test.
    #[derive(Default)]
    pub struct ProviderProbe {
        pub active: AtomicBool,
        pub initialized: AtomicUsize,
        pub shutdowns: AtomicUsize,
        pub polls: AtomicUsize,
        pub script: Mutex<Vec<Vec<InputEvent>>>,
    }

    impl ProviderProbe {
        pub fn is_active(&self) -> bool {
            self.active.load(Ordering::SeqCst)
        }

        pub fn shutdowns(&self) -> usize {
            self.shutdowns.load(Ordering::SeqCst)
        }

        pub fn push_frame(&self, events: Vec<InputEvent>) {
            self.script.lock().unwrap().push(events);
        }
    }

    /// Replays queued event batches, one batch per poll.
    pub struct ScriptedProvider {
        pub probe: Arc<ProviderProbe>,
        pub fail_with: Option<fn() -> ProviderError>,
    }

    impl InputProvider for ScriptedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::MediapipeFace
        }

        fn initialize(&mut self, _config: &ProviderConfig) -> Result<(), ProviderError> {
            self.probe.initialized.fetch_add(1, Ordering::SeqCst);
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            self.probe.active.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn poll(&mut self, _keys: &KeyState) -> Vec<InputEvent> {
            self.probe.polls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.probe.script.lock().unwrap();
            if script.is_empty() {
                Vec::new()
            } else {
                script.remove(0)
            }
        }

        fn shutdown(&mut self) {
            if self.probe.active.swap(false, Ordering::SeqCst) {
                self.probe.shutdowns.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn is_active(&self) -> bool {
            self.probe.is_active()
        }
    }

    pub fn test_config() -> ProviderConfig {
        crate::shared::settings::Settings::default().provider_config()
    }
}
