/// Directory name used under the platform config and cache directories.
pub const APP_DIR_NAME: &str = "FacePlay";

pub const FACE_MESH_MODEL_NAME: &str = "face_landmark.onnx";

/// Relative directory searched for a model shipped next to the binary.
pub const BUNDLED_MODEL_DIR: &str = "assets/models";

/// Namespace under which external crates register their games.
pub const ENTRY_POINT_NAMESPACE: &str = "faceplay.games";

pub const DEFAULT_FPS: u32 = 30;

/// Logical screen size in pixels. Each terminal cell shows two stacked pixels.
pub const SCREEN_WIDTH: u32 = 96;
pub const SCREEN_HEIGHT: u32 = 64;

pub const CAMERA_WIDTH: u32 = 320;
pub const CAMERA_HEIGHT: u32 = 240;

pub const DEFAULT_BLINK_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MOUTH_THRESHOLD: f64 = 0.4;
pub const DEFAULT_SMILE_THRESHOLD: f64 = 0.5;
/// Head roll in degrees past which a tilt registers as a move.
pub const DEFAULT_TILT_THRESHOLD: f64 = 15.0;
/// Nose position between eye line (0.0) and mouth line (1.0).
pub const DEFAULT_PITCH_UP_THRESHOLD: f64 = 0.35;
pub const DEFAULT_PITCH_DOWN_THRESHOLD: f64 = 0.75;

/// Minimum face-presence score for a mesh result to count as a face.
pub const FACE_PRESENCE_THRESHOLD: f64 = 0.5;
