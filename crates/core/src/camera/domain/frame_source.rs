use crate::shared::frame::Frame;

/// Which camera to open and how to configure it.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub index: u32,
    /// Backend-specific device string; takes precedence over `index`.
    pub device: Option<String>,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl CameraConfig {
    /// Human-readable device name for error messages.
    pub fn describe(&self) -> String {
        match &self.device {
            Some(device) => device.clone(),
            None => format!("camera {}", self.index),
        }
    }
}

/// A live frame source such as a webcam.
///
/// Implementations own the capture handle between `open` and `close`;
/// `close` must be safe to call repeatedly.
pub trait FrameSource: Send {
    fn open(&mut self, config: &CameraConfig) -> Result<(), Box<dyn std::error::Error>>;

    /// Blocks until the next frame. `Ok(None)` means no frame was available.
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    fn close(&mut self);

    fn is_open(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(device: Option<&str>) -> CameraConfig {
        CameraConfig {
            index: 2,
            device: device.map(str::to_string),
            width: 320,
            height: 240,
            fps: 30,
        }
    }

    #[test]
    fn test_describe_uses_index_by_default() {
        assert_eq!(config(None).describe(), "camera 2");
    }

    #[test]
    fn test_describe_prefers_device() {
        assert_eq!(config(Some("/dev/video4")).describe(), "/dev/video4");
    }
}
