use ffmpeg_next::format::context::Input;
use ffmpeg_next::software::scaling;

use crate::camera::domain::frame_source::{CameraConfig, FrameSource};
use crate::shared::frame::Frame;

/// Live webcam capture through libavdevice.
///
/// Uses the platform capture backend (`video4linux2`, `avfoundation` or
/// `dshow`) and converts every decoded frame to RGB24.
pub struct FfmpegCamera {
    capture: Option<Capture>,
    frame_index: usize,
}

struct Capture {
    ictx: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
}

// Safety: FfmpegCamera is owned by one thread at a time. The raw pointers
// inside the ffmpeg types are never shared.
unsafe impl Send for FfmpegCamera {}

impl FfmpegCamera {
    pub fn new() -> Self {
        Self {
            capture: None,
            frame_index: 0,
        }
    }
}

impl Default for FfmpegCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FfmpegCamera {
    fn open(&mut self, config: &CameraConfig) -> Result<(), Box<dyn std::error::Error>> {
        self.close();
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let backend = capture_backend();
        let format = ffmpeg_next::device::input::video()
            .find(|f| f.name().split(',').any(|name| name == backend))
            .ok_or_else(|| format!("capture backend '{backend}' is not available in this ffmpeg build"))?;
        let url = device_url(config)?;

        let mut options = ffmpeg_next::Dictionary::new();
        options.set("video_size", &format!("{}x{}", config.width, config.height));
        options.set("framerate", &config.fps.to_string());

        let ictx = match ffmpeg_next::format::open_with(
            &url,
            &ffmpeg_next::format::Format::Input(format),
            options,
        )? {
            ffmpeg_next::format::context::Context::Input(ictx) => ictx,
            ffmpeg_next::format::context::Context::Output(_) => {
                return Err(format!("'{url}' opened as an output").into())
            }
        };

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("camera exposes no video stream")?;
        let stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        log::info!("Opened {} via {backend} at {width}x{height}", config.describe());
        self.capture = Some(Capture {
            ictx,
            decoder,
            scaler,
            stream_index,
            width,
            height,
        });
        self.frame_index = 0;
        Ok(())
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(capture) = self.capture.as_mut() else {
            return Err("camera is not open".into());
        };

        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        loop {
            if capture.decoder.receive_frame(&mut decoded).is_ok() {
                let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
                capture.scaler.run(&decoded, &mut rgb)?;
                let pixels = extract_rgb_pixels(&rgb, capture.width, capture.height);
                let frame = Frame::new(pixels, capture.width, capture.height, self.frame_index);
                self.frame_index += 1;
                return Ok(Some(frame));
            }

            let Some((stream, packet)) = capture.ictx.packets().next() else {
                return Ok(None);
            };
            if stream.index() != capture.stream_index {
                continue;
            }
            capture.decoder.send_packet(&packet)?;
        }
    }

    fn close(&mut self) {
        if self.capture.take().is_some() {
            log::debug!("Camera closed after {} frames", self.frame_index);
        }
    }

    fn is_open(&self) -> bool {
        self.capture.is_some()
    }
}

impl Drop for FfmpegCamera {
    fn drop(&mut self) {
        self.close();
    }
}

fn capture_backend() -> &'static str {
    if cfg!(target_os = "macos") {
        "avfoundation"
    } else if cfg!(target_os = "windows") {
        "dshow"
    } else {
        "video4linux2"
    }
}

/// Backend-specific device URL. An explicit device string wins over the
/// numeric index.
fn device_url(config: &CameraConfig) -> Result<String, String> {
    if let Some(device) = &config.device {
        return Ok(device.clone());
    }
    if cfg!(target_os = "macos") {
        Ok(format!("{}:none", config.index))
    } else if cfg!(target_os = "windows") {
        Err("dshow needs a device name, e.g. --camera-device \"video=Integrated Camera\"".into())
    } else {
        Ok(format!("/dev/video{}", config.index))
    }
}

/// Copy RGB24 rows out of a possibly padded ffmpeg frame.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * Frame::CHANNELS;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(index: u32, device: Option<&str>) -> CameraConfig {
        CameraConfig {
            index,
            device: device.map(str::to_string),
            width: 320,
            height: 240,
            fps: 30,
        }
    }

    #[test]
    fn test_explicit_device_wins() {
        assert_eq!(
            device_url(&config(3, Some("/dev/video9"))).unwrap(),
            "/dev/video9"
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_index_maps_to_video_node() {
        assert_eq!(device_url(&config(1, None)).unwrap(), "/dev/video1");
        assert_eq!(capture_backend(), "video4linux2");
    }

    #[test]
    fn test_read_before_open_is_error() {
        let mut camera = FfmpegCamera::new();
        assert!(!camera.is_open());
        assert!(camera.read().is_err());
        camera.close();
        camera.close();
    }
}
