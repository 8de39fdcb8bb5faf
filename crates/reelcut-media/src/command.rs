//! FFmpeg invocation.
//!
//! Every media operation in this crate is one FFmpeg process: build an
//! [`FfmpegCommand`], hand it to an [`FfmpegRunner`], wait for exit.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Output path that makes FFmpeg write to stdout.
pub const STDOUT: &str = "-";

/// Lines of stderr kept in a failure.
const STDERR_TAIL_LINES: usize = 20;

/// One FFmpeg process: a single input, a single output, and the options
/// that go on either side of `-i`.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    before_input: Vec<String>,
    after_input: Vec<String>,
    verbosity: String,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            before_input: Vec::new(),
            after_input: Vec::new(),
            verbosity: "error".to_string(),
        }
    }

    /// Option placed before `-i`, applying to the input.
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.before_input.push(arg.into());
        self
    }

    /// Option placed after `-i`, applying to the output.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.after_input.push(arg.into());
        self
    }

    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after_input.extend(args.into_iter().map(Into::into));
        self
    }

    /// Input-side seek, which is fast and frame-accurate when re-encoding.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    pub fn duration(self, seconds: f64) -> Self {
        self.input_arg("-t").input_arg(format!("{:.3}", seconds))
    }

    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    pub fn codec_copy(self) -> Self {
        self.output_arg("-c").output_arg("copy")
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    /// Put the moov atom first so clips start playing before they finish
    /// downloading.
    pub fn faststart(self) -> Self {
        self.output_arg("-movflags").output_arg("+faststart")
    }

    /// FFmpeg `-v` level; `info` is needed to see filter output such as
    /// `showinfo`.
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.verbosity = level.into();
        self
    }

    /// Full argument list, always overwriting the output.
    pub fn build_args(&self) -> Vec<String> {
        let preamble = ["-y", "-hide_banner", "-nostdin", "-v"];
        preamble
            .iter()
            .map(|s| s.to_string())
            .chain(std::iter::once(self.verbosity.clone()))
            .chain(self.before_input.iter().cloned())
            .chain(["-i".to_string(), self.input.to_string_lossy().to_string()])
            .chain(self.after_input.iter().cloned())
            .chain(std::iter::once(self.output.to_string_lossy().to_string()))
            .collect()
    }
}

/// What a successful FFmpeg process left behind.
#[derive(Debug, Clone, Default)]
pub struct FfmpegOutput {
    pub stdout: Vec<u8>,
    pub stderr: String,
}

/// Spawns FFmpeg and waits for it.
///
/// No timeout or cancellation: the future resolves when the process exits.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    binary: String,
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        self.output(cmd).await.map(|_| ())
    }

    /// Run to completion, capturing stdout and stderr.
    ///
    /// A non-zero exit becomes [`MediaError::FfmpegFailed`] carrying the
    /// tail of stderr.
    pub async fn output(&self, cmd: &FfmpegCommand) -> MediaResult<FfmpegOutput> {
        which::which(&self.binary).map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!(binary = %self.binary, args = %args.join(" "), "Running FFmpeg");

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(MediaError::ffmpeg_failed(
                format!("{} exited with {}", self.binary, output.status),
                Some(stderr_tail(&stderr)),
                output.status.code(),
            ));
        }

        Ok(FfmpegOutput {
            stdout: output.stdout,
            stderr,
        })
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}

pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}
