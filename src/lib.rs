//! Lessonforge - turn a short video into a structured bilingual lesson.
//!
//! This library extracts the audio track from a video file, transcribes it
//! through a remote speech-recognition endpoint, and asks a remote text
//! generation endpoint to rework the transcript into lesson content (story,
//! quiz, and matching exercises) persisted as a JSON document.

pub mod cli;
pub mod config;
pub mod extractors;
pub mod lesson;
pub mod output;
pub mod pipeline;
pub mod transcribe;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use lesson::{LessonDocument, LessonItem};
pub use pipeline::LessonPipeline;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Failure taxonomy for a pipeline run. Every variant is terminal for the
/// current run; the only internal retry is the codec swap inside the
/// subprocess extraction strategy.
#[derive(thiserror::Error, Debug)]
pub enum LessonforgeError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("missing dependency: {0}")]
    DependencyMissing(String),

    #[error("audio extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("transcription failed: {0}")]
    TranscriptionFailure(String),

    #[error("lesson generation failed: {0}")]
    GenerationFailure(String),

    #[error("could not persist lesson: {0}")]
    PersistenceFailure(String),
}
