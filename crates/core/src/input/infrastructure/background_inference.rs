use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, TrySendError};

use crate::input::domain::provider_error::ProviderError;

use super::face_sampler::{FaceSampler, Sample};

/// Pause after a failed read before trying the camera again.
const RETRY_DELAY: Duration = Duration::from_millis(20);

/// Runs a [`FaceSampler`] on its own thread so camera reads and inference
/// never block the frame loop.
///
/// The channel holds one sample. When the frame loop falls behind, older
/// samples are dropped and only the newest is kept.
pub struct InferenceWorker {
    stop: Arc<AtomicBool>,
    rx: Receiver<Sample>,
    handle: Option<JoinHandle<FaceSampler>>,
}

impl InferenceWorker {
    /// Takes an already opened sampler.
    pub fn spawn(mut sampler: FaceSampler) -> Result<Self, ProviderError> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = crossbeam_channel::bounded::<Sample>(1);
        let drain = rx.clone();
        let stop_flag = stop.clone();

        let handle = std::thread::Builder::new()
            .name("face-inference".into())
            .spawn(move || {
                while !stop_flag.load(Ordering::Relaxed) {
                    let mut pending = match sampler.sample() {
                        Sample::Skipped => continue,
                        sample => sample,
                    };
                    let failed = pending == Sample::Unavailable;
                    loop {
                        match tx.try_send(pending) {
                            Ok(()) => break,
                            Err(TrySendError::Full(sample)) => {
                                let _ = drain.try_recv();
                                pending = sample;
                            }
                            Err(TrySendError::Disconnected(_)) => return sampler,
                        }
                    }
                    if failed {
                        std::thread::sleep(RETRY_DELAY);
                    }
                }
                sampler
            })
            .map_err(|e| ProviderError::DeviceUnavailable {
                device: "inference thread".into(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            stop,
            rx,
            handle: Some(handle),
        })
    }

    /// Newest sample since the last call, if any.
    pub fn latest(&self) -> Option<Sample> {
        self.rx.try_recv().ok()
    }

    /// Stop the thread and hand back the sampler so it can be closed.
    /// Returns `None` if the worker already stopped or panicked.
    pub fn stop(&mut self) -> Option<FaceSampler> {
        self.stop.store(true, Ordering::Relaxed);
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(sampler) => Some(sampler),
            Err(_) => {
                log::error!("Inference thread panicked");
                None
            }
        }
    }
}

impl Drop for InferenceWorker {
    fn drop(&mut self) {
        if let Some(mut sampler) = self.stop() {
            sampler.close();
        }
    }
}
