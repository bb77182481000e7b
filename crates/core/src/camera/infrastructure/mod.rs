pub mod ffmpeg_camera;
