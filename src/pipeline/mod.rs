use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::extractors::ExtractorChain;
use crate::lesson::LessonGenerator;
use crate::output;
use crate::transcribe::Transcriber;
use crate::Result;

/// Pipeline stages in execution order. A run moves through them strictly
/// sequentially; any failure is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extracting,
    Transcribing,
    Generating,
    Persisting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extracting => write!(f, "audio extraction"),
            Stage::Transcribing => write!(f, "transcription"),
            Stage::Generating => write!(f, "lesson generation"),
            Stage::Persisting => write!(f, "persistence"),
        }
    }
}

/// Sequential extract → transcribe → generate → persist pipeline.
pub struct LessonPipeline {
    extractors: ExtractorChain,
    transcriber: Transcriber,
    generator: LessonGenerator,
}

impl LessonPipeline {
    pub fn new(config: &Config) -> Self {
        Self {
            extractors: ExtractorChain::new(),
            transcriber: Transcriber::new(config),
            generator: LessonGenerator::new(config),
        }
    }

    /// Run the full pipeline for one video. Returns the lesson file path.
    pub async fn run(&self, video: &Path) -> Result<PathBuf> {
        let video_name = video
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| video.display().to_string());
        println!("=== Processing video: {} ===", style(&video_name).bold());

        println!("{}", style("Step 1/3: extracting audio...").cyan());
        let audio_path = self.extractors.extract(video, None).await?;
        tracing::info!(stage = %Stage::Extracting, audio = %audio_path.display(), "stage complete");

        // Once the artifact exists, every later outcome shares one cleanup
        // path for it.
        let result = self.run_from_audio(video, &audio_path).await;
        cleanup_audio(&audio_path);
        result
    }

    async fn run_from_audio(&self, video: &Path, audio_path: &Path) -> Result<PathBuf> {
        println!("{}", style("Step 2/3: transcribing speech...").cyan());
        let spinner = stage_spinner("Waiting for the speech-recognition endpoint...");
        let transcript = self.transcriber.transcribe(audio_path).await;
        spinner.finish_and_clear();
        let transcript = transcript?;
        tracing::info!(stage = %Stage::Transcribing, "stage complete");
        print_transcript_preview(&transcript);

        println!("{}", style("Step 3/3: generating lesson content...").cyan());
        let spinner = stage_spinner("Waiting for the text-generation endpoint...");
        let document = self.generator.generate(&transcript).await;
        spinner.finish_and_clear();
        let document = document?;
        tracing::info!(stage = %Stage::Generating, items = document.items.len(), "stage complete");

        let output_path = output::lesson_output_path(&std::env::current_dir()?, video);
        output::save_lesson(&document, &output_path)?;
        tracing::info!(stage = %Stage::Persisting, path = %output_path.display(), "stage complete");

        Ok(output_path)
    }
}

fn stage_spinner(message: &'static str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    progress.enable_steady_tick(Duration::from_millis(120));
    progress.set_message(message);
    progress
}

fn print_transcript_preview(transcript: &str) {
    let char_count = transcript.chars().count();
    let preview: String = transcript.chars().take(200).collect();
    let ellipsis = if char_count > 200 { "..." } else { "" };

    println!("--- Transcript ({} chars) ---", char_count);
    println!("{}{}", preview, ellipsis);
    println!("------------------------------");
}

/// Best-effort removal of the intermediate audio artifact.
fn cleanup_audio(audio_path: &Path) {
    if !audio_path.exists() {
        return;
    }

    match fs_err::remove_file(audio_path) {
        Ok(()) => tracing::debug!(path = %audio_path.display(), "removed intermediate audio file"),
        Err(e) => {
            tracing::warn!(path = %audio_path.display(), error = %e, "could not remove intermediate audio file")
        }
    }
}
