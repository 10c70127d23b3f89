use reqwest::multipart;
use serde::Deserialize;
use std::path::Path;

use crate::config::Config;
use crate::{LessonforgeError, Result};

/// Object-shaped reply some deployments send instead of a bare text body.
#[derive(Debug, Deserialize)]
struct TranscriptionBody {
    text: String,
}

/// Client for the remote speech-recognition endpoint.
pub struct Transcriber {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl Transcriber {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.asr_model.clone(),
        }
    }

    /// Send the audio file to the speech-recognition endpoint and return the
    /// plain-text transcript.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let audio_data = fs_err::read(audio_path).map_err(|e| {
            LessonforgeError::TranscriptionFailure(format!(
                "could not read audio file {}: {}",
                audio_path.display(),
                e
            ))
        })?;

        let file_name = audio_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("audio.mp3")
            .to_string();

        let file_part = multipart::Part::bytes(audio_data)
            .file_name(file_name)
            .mime_str("audio/mpeg")
            .map_err(|e| LessonforgeError::TranscriptionFailure(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", file_part);

        tracing::debug!(model = %self.model, "sending audio to speech-recognition endpoint");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LessonforgeError::TranscriptionFailure(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(LessonforgeError::TranscriptionFailure(format!(
                "endpoint returned {}: {}",
                status, body
            ))
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| LessonforgeError::TranscriptionFailure(format!("body: {}", e)))?;

        let transcript = normalize_transcript(&body);
        if transcript.is_empty() {
            return Err(LessonforgeError::TranscriptionFailure(
                "endpoint returned an empty transcript".to_string(),
            )
            .into());
        }

        tracing::info!(chars = transcript.chars().count(), "transcription completed");

        Ok(transcript)
    }
}

/// The endpoint replies with bare text when `response_format=text` is
/// honored, or with a `{"text": ...}` object otherwise.
fn normalize_transcript(body: &str) -> String {
    match serde_json::from_str::<TranscriptionBody>(body) {
        Ok(parsed) => parsed.text.trim().to_string(),
        Err(_) => body.trim().to_string(),
    }
}
