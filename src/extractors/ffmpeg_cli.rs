use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;

use super::{AudioFormat, ExtractionStrategy};
use crate::{LessonforgeError, Result};

/// Fallback strategy: invoke the external `ffmpeg` encoder from PATH.
///
/// On a non-zero exit the encode is retried once with the compatible
/// alternate codec, then the strategy gives up.
pub struct FfmpegCliExtractor {
    ffmpeg_path: String,
}

impl FfmpegCliExtractor {
    pub fn new() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
        }
    }

    async fn run_encoder(
        &self,
        video: &Path,
        audio: &Path,
        codec: &str,
    ) -> Result<std::process::Output> {
        tracing::debug!(
            video = %video.display(),
            audio = %audio.display(),
            codec,
            "invoking external ffmpeg encoder"
        );

        let output = Command::new(&self.ffmpeg_path)
            .args([
                "-i",
                &video.to_string_lossy(),
                "-vn", // No video
                "-acodec",
                codec,
                "-y", // Overwrite output file
                &audio.to_string_lossy(),
            ])
            .output()
            .await
            .map_err(|e| -> anyhow::Error {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LessonforgeError::DependencyMissing(
                        "ffmpeg not found; install ffmpeg and ensure it is reachable on PATH"
                            .to_string(),
                    )
                    .into()
                } else {
                    anyhow::Error::new(e).context("Failed to execute ffmpeg")
                }
            })?;

        Ok(output)
    }
}

impl Default for FfmpegCliExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionStrategy for FfmpegCliExtractor {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn attempt(&self, video: &Path, audio: &Path, format: AudioFormat) -> Result<()> {
        let output = self.run_encoder(video, audio, format.codec_name()).await?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let retry_codec = format.swapped();
        tracing::warn!(
            codec = format.codec_name(),
            retry_codec = retry_codec.codec_name(),
            "ffmpeg exited non-zero, retrying with swapped codec: {}",
            stderr.trim()
        );

        let output = self
            .run_encoder(video, audio, retry_codec.codec_name())
            .await?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!(
            "ffmpeg failed with codecs {} and {}: {}",
            format.codec_name(),
            retry_codec.codec_name(),
            stderr.trim()
        );
    }
}
