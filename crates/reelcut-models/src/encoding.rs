//! Output encoding used whenever a clip is re-encoded.
//!
//! Cuts and remediation renders share one setting so a blurred and marked
//! clip looks like its untouched neighbours.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// x264 with AAC audio; the settings every short-form platform accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EncodingConfig {
    pub codec: String,
    pub preset: String,
    /// x264 quality, 0 to 51, lower keeps more detail
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: "libx264".into(),
            preset: "fast".into(),
            crf: 20,
            audio_codec: "aac".into(),
            audio_bitrate: "128k".into(),
        }
    }
}

impl EncodingConfig {
    pub fn with_crf(self, crf: u8) -> Self {
        Self { crf, ..self }
    }

    pub fn with_preset(self, preset: impl Into<String>) -> Self {
        Self {
            preset: preset.into(),
            ..self
        }
    }

    /// Output-side codec flags, in the order FFmpeg expects them.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        [
            ("-c:v", self.codec.clone()),
            ("-preset", self.preset.clone()),
            ("-crf", self.crf.to_string()),
            ("-c:a", self.audio_codec.clone()),
            ("-b:a", self.audio_bitrate.clone()),
        ]
        .into_iter()
        .flat_map(|(flag, value)| [flag.to_string(), value])
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_pair_with_values() {
        let args = EncodingConfig::default().with_crf(24).to_ffmpeg_args();
        assert_eq!(args.len(), 10);
        let crf = args.iter().position(|a| a == "-crf").unwrap();
        assert_eq!(args[crf + 1], "24");
        assert_eq!(args[1], "libx264");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg: EncodingConfig = serde_json::from_str(r#"{"preset": "veryfast"}"#).unwrap();
        assert_eq!(cfg.preset, "veryfast");
        assert_eq!(cfg.crf, 20);
        assert_eq!(cfg.audio_codec, "aac");
    }
}
