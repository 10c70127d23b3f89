use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub mod ffmpeg_cli;
pub mod sidecar;

use crate::utils::is_video_path;
use crate::{LessonforgeError, Result};

/// Audio codecs the extraction strategies may target. The two variants are
/// mutually compatible for the one-shot codec-swap retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Aac,
}

impl AudioFormat {
    /// File extension of the extracted artifact
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
        }
    }

    /// Codec name as understood by ffmpeg's `-acodec`
    pub fn codec_name(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
        }
    }

    /// The compatible alternate codec used by the retry
    pub fn swapped(&self) -> Self {
        match self {
            AudioFormat::Mp3 => AudioFormat::Aac,
            AudioFormat::Aac => AudioFormat::Mp3,
        }
    }
}

/// One way of turning a video file into a standalone audio file.
///
/// Strategies are tried in registration order; a strategy either writes the
/// requested artifact or returns an error and the next one is attempted.
#[async_trait]
pub trait ExtractionStrategy: Send + Sync {
    /// Name used in logs and failure reports
    fn name(&self) -> &'static str;

    /// Write the audio track of `video` to `audio` in the given format
    async fn attempt(&self, video: &Path, audio: &Path, format: AudioFormat) -> Result<()>;
}

/// Ordered chain of extraction strategies.
pub struct ExtractorChain {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    format: AudioFormat,
}

impl ExtractorChain {
    /// Create a chain with the default strategies: the ffmpeg-sidecar
    /// library call first, the external encoder subprocess second.
    pub fn new() -> Self {
        let mut chain = Self {
            strategies: Vec::new(),
            format: AudioFormat::Mp3,
        };

        chain.register(Box::new(sidecar::SidecarExtractor::new()));
        chain.register(Box::new(ffmpeg_cli::FfmpegCliExtractor::new()));

        chain
    }

    /// Register an additional strategy at the end of the chain
    pub fn register(&mut self, strategy: Box<dyn ExtractionStrategy>) {
        self.strategies.push(strategy);
    }

    /// Extract the audio track of `video`.
    ///
    /// When `dest` is not supplied the artifact lands next to the video,
    /// same base name, with the target audio extension. Returns the artifact
    /// path; the path is guaranteed to exist and be non-empty.
    pub async fn extract(&self, video: &Path, dest: Option<&Path>) -> Result<PathBuf> {
        validate_video(video)?;

        let audio = match dest {
            Some(path) => path.to_path_buf(),
            None => video.with_extension(self.format.extension()),
        };

        let mut failures = Vec::new();

        for strategy in &self.strategies {
            tracing::info!(strategy = strategy.name(), "attempting audio extraction");

            match strategy.attempt(video, &audio, self.format).await {
                Ok(()) => match verify_artifact(&audio) {
                    Ok(()) => {
                        tracing::info!(
                            strategy = strategy.name(),
                            audio = %audio.display(),
                            "audio extraction succeeded"
                        );
                        return Ok(audio);
                    }
                    Err(e) => {
                        tracing::warn!(strategy = strategy.name(), error = %e, "extraction strategy failed");
                        failures.push(format!("{}: {}", strategy.name(), e));
                    }
                },
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), error = %e, "extraction strategy failed");
                    failures.push(format!("{}: {}", strategy.name(), e));
                }
            }
        }

        // A failed encoder run can leave a partial artifact behind.
        remove_partial_artifact(&audio);

        Err(LessonforgeError::ExtractionFailure(format!(
            "all strategies exhausted for {} ({})",
            video.display(),
            failures.join("; ")
        ))
        .into())
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the source video exists and carries a recognized container extension
fn validate_video(video: &Path) -> Result<()> {
    if !video.exists() {
        return Err(
            LessonforgeError::InvalidInput(format!("file does not exist: {}", video.display()))
                .into(),
        );
    }

    if !video.is_file() {
        return Err(
            LessonforgeError::InvalidInput(format!("path is not a file: {}", video.display()))
                .into(),
        );
    }

    if !is_video_path(video) {
        return Err(LessonforgeError::InvalidInput(format!(
            "not a recognized video container: {}",
            video.display()
        ))
        .into());
    }

    Ok(())
}

/// A strategy that reports success must have produced a non-empty file
fn verify_artifact(audio: &Path) -> Result<()> {
    let metadata = fs_err::metadata(audio)
        .map_err(|e| anyhow::anyhow!("reported success but produced no output: {}", e))?;

    if metadata.len() == 0 {
        anyhow::bail!("produced an empty file: {}", audio.display());
    }

    Ok(())
}

fn remove_partial_artifact(audio: &Path) {
    if audio.exists() {
        if let Err(e) = fs_err::remove_file(audio) {
            tracing::warn!(path = %audio.display(), error = %e, "could not remove partial audio artifact");
        }
    }
}
