use crate::error::AppError;
use anyhow::{Result, anyhow};
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

/// Capability interface over the external transcoding tool, so tests can
/// substitute a fake without invoking a real binary. An `Err` carries the
/// tool's diagnostic text.
#[async_trait::async_trait]
pub trait Transcoder: Send + Sync {
    /// Re-encode `input` into `output`, suspending until the tool exits.
    async fn run(&self, input: &Path, output: &Path) -> Result<()>;
}

/// Invokes ffmpeg with a fixed, non-configurable argument set: H.264 video,
/// AAC audio, faststart container layout, rotation metadata cleared, yuv420p
/// pixel format. This is normalize-and-reencode, not general transcoding.
pub struct FfmpegTranscoder {
    binary: String,
}

impl FfmpegTranscoder {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait::async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn run(&self, input: &Path, output: &Path) -> Result<()> {
        let out = Command::new(&self.binary)
            .arg("-y")
            .arg("-i")
            .arg(input)
            .args(["-c:v", "libx264"])
            .args(["-c:a", "aac"])
            .args(["-movflags", "+faststart"])
            .args(["-metadata:s:v:0", "rotate=0"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(output)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| anyhow!("failed to launch {}: {}", self.binary, e))?;

        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(anyhow!(
                "{} exited with {}: {}",
                self.binary,
                out.status,
                stderr.trim()
            ));
        }

        Ok(())
    }
}

/// Passthrough transcoder for development and tests: copies the input file
/// to the output path byte for byte.
pub struct CopyTranscoder;

#[async_trait::async_trait]
impl Transcoder for CopyTranscoder {
    async fn run(&self, input: &Path, output: &Path) -> Result<()> {
        tracing::warn!("CopyTranscoder: passing video through without re-encoding");
        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}

/// Transcoder that writes a partial output and then fails, mimicking a tool
/// killed mid-encode. Used to exercise cleanup paths in tests.
pub struct FailingTranscoder;

#[async_trait::async_trait]
impl Transcoder for FailingTranscoder {
    async fn run(&self, _input: &Path, output: &Path) -> Result<()> {
        tokio::fs::write(output, b"partial").await?;
        Err(anyhow!("moov atom not found: invalid data"))
    }
}

/// Runs a transcode with the pipeline's pre/post conditions: the input must
/// exist, the output directory is created on demand, and a partially written
/// output never survives a failure. The caller disposes of the input.
pub async fn normalize(
    transcoder: &dyn Transcoder,
    input: &Path,
    output: &Path,
) -> Result<(), AppError> {
    if !tokio::fs::try_exists(input).await.unwrap_or(false) {
        return Err(AppError::InvalidInput(format!(
            "input file does not exist: {}",
            input.display()
        )));
    }

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    if let Err(err) = transcoder.run(input, output).await {
        if tokio::fs::try_exists(output).await.unwrap_or(false) {
            let _ = tokio::fs::remove_file(output).await;
        }
        return Err(AppError::TranscodeFailed(err.to_string()));
    }

    Ok(())
}

/// Factory function to create the transcoder named by configuration.
pub fn create_transcoder(kind: &str, ffmpeg_path: &str) -> Arc<dyn Transcoder> {
    match kind.to_lowercase().as_str() {
        "copy" | "noop" => Arc::new(CopyTranscoder),
        "ffmpeg" => Arc::new(FfmpegTranscoder::new(ffmpeg_path)),
        other => {
            tracing::warn!("unknown transcoder '{}', using ffmpeg", other);
            Arc::new(FfmpegTranscoder::new(ffmpeg_path))
        }
    }
}
