use anyhow::Context;
use async_trait::async_trait;
use ffmpeg_sidecar::command::{ffmpeg_is_installed, FfmpegCommand};
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::Path;

use super::{AudioFormat, ExtractionStrategy};
use crate::{LessonforgeError, Result};

/// Primary strategy: library-call extraction through ffmpeg-sidecar.
///
/// The sidecar API drives its own ffmpeg binary, so this strategy works
/// without an encoder configured on PATH. ffmpeg-sidecar is a blocking API;
/// the work runs on a blocking task.
pub struct SidecarExtractor;

impl SidecarExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SidecarExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExtractionStrategy for SidecarExtractor {
    fn name(&self) -> &'static str {
        "ffmpeg-sidecar"
    }

    async fn attempt(&self, video: &Path, audio: &Path, format: AudioFormat) -> Result<()> {
        if !ffmpeg_is_installed() {
            return Err(LessonforgeError::DependencyMissing(
                "ffmpeg-sidecar could not locate an ffmpeg binary; install ffmpeg to enable library-based extraction".to_string(),
            )
            .into());
        }

        let video = video.to_path_buf();
        let audio = audio.to_path_buf();

        tracing::debug!(
            video = %video.display(),
            audio = %audio.display(),
            codec = format.codec_name(),
            "extracting audio track via ffmpeg-sidecar"
        );

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut child = FfmpegCommand::new()
                .input(video.to_string_lossy())
                .no_video()
                .codec_audio(format.codec_name())
                .overwrite()
                .output(audio.to_string_lossy())
                .spawn()
                .context("Failed to spawn ffmpeg-sidecar")?;

            // Drain the event stream; an unread stderr pipe can stall ffmpeg.
            let mut error_lines = Vec::new();
            for event in child.iter().context("Failed to read ffmpeg-sidecar events")? {
                if let FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, message) = event {
                    error_lines.push(message);
                }
            }

            let status = child
                .wait()
                .context("ffmpeg-sidecar did not run to completion")?;

            if !status.success() {
                anyhow::bail!(
                    "ffmpeg-sidecar exited with status {}: {}",
                    status,
                    error_lines.join("; ")
                );
            }

            Ok(())
        })
        .await
        .context("extraction task panicked")??;

        Ok(())
    }
}
