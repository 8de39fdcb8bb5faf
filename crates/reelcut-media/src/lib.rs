//! FFmpeg CLI wrapper for clip processing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Clip cutting, frame and audio extraction
//! - In-place remediation (full-frame blur, marker overlay)
//! - Scene-change detection from FFmpeg's scene score
//! - Concatenation of clips into a combined reel
//! - Collaborator traits the pipeline is written against, with an FFmpeg
//!   implementation

pub mod clip;
pub mod command;
pub mod concat;
pub mod error;
pub mod fs_utils;
pub mod probe;
pub mod remediation;
pub mod scene;
pub mod tool;

pub use clip::{cut_clip, extract_audio, extract_frame_png};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegOutput, FfmpegRunner};
pub use concat::concat_clips;
pub use error::{MediaError, MediaResult};
pub use fs_utils::{move_file, remove_if_exists};
pub use probe::{get_duration, probe_media, MediaInfo};
pub use remediation::{blur_in_place, overlay_in_place, MarkerConfig, DEFAULT_ASSETS_DIR};
pub use scene::{detect_scene_changes, DEFAULT_SCENE_THRESHOLD};
pub use tool::{Combiner, Cutter, FfmpegTool, FrameSampler, Prober, Remediator, SceneDetector};
