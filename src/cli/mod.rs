use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lessonforge",
    about = "Lessonforge - Turn a short video into a structured bilingual lesson",
    version,
    long_about = "A CLI tool that extracts the audio track from a video file, transcribes it with the SiliconFlow speech-recognition API, and generates bilingual lesson content (story, quiz, and matching exercises) as a JSON document."
)]
pub struct Cli {
    /// Path to the source video file (mp4, mkv, avi, mov, ...)
    #[arg(value_name = "VIDEO")]
    pub video: PathBuf,
}
