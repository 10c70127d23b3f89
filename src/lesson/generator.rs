use serde::{Deserialize, Serialize};

use super::LessonDocument;
use crate::config::Config;
use crate::{LessonforgeError, Result};

/// Fixed sampling temperature; fluent but non-deterministic phrasing.
const TEMPERATURE: f32 = 0.7;

/// Generous ceiling so the full multi-item structure fits in one reply.
const MAX_TOKENS: usize = 4096;

const SYSTEM_PROMPT: &str = r#"You are a professional educational content generator. Your task is to turn the transcript of a video into structured bilingual English-learning lesson data.

Output a raw JSON string following the structure below exactly. Do not wrap the output in Markdown code fences (no ```json markers).

Target JSON structure (TypeScript interface):

type LessonItem =
  | { id: string; type: 'story'; content: { english: string; chinese: string; audio: string } }
  | { id: string; type: 'quiz'; content: { question: string; options: string[]; correctAnswer: string; explanation: string } }
  | { id: string; type: 'match'; content: { pairs: { id: string; left: string; right: string }[] } };

Requirements:
1. Story: rewrite the transcript as 3-5 engaging bilingual story segments (English plus Chinese translation), each segment covering one stage of the story. Fill the audio field with "mock_audio_generated".
2. Quiz: create 2-3 multiple-choice questions about the story. Question types may cover comprehension of details, vocabulary meaning, or cultural background. correctAnswer must exactly match one of the entries in options.
3. Match: create exactly 1 matching game extracting 4-6 key words or phrases with their translations.
4. Language: keep the English simple, natural, and idiomatic; keep the Chinese modern, conversational, and appropriate to the context.

The output must be a single JSON array of LessonItem objects: LessonItem[]"#;

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Client for the remote text-generation endpoint.
pub struct LessonGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LessonGenerator {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.llm_model.clone(),
        }
    }

    /// Ask the text-generation endpoint to turn a transcript into a
    /// validated lesson document.
    pub async fn generate(&self, transcript: &str) -> Result<LessonDocument> {
        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format!(
                        "This is the video transcript:\n\n{}\n\nGenerate the corresponding lesson JSON data.",
                        transcript
                    ),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = %self.model, "requesting lesson generation");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LessonforgeError::GenerationFailure(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LessonforgeError::GenerationFailure(format!(
                "endpoint returned {}: {}",
                status, body
            ))
            .into());
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LessonforgeError::GenerationFailure(format!("malformed response: {}", e)))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| {
                LessonforgeError::GenerationFailure("endpoint returned no choices".to_string())
            })?;

        parse_lesson(content)
    }
}

/// Models sometimes wrap the payload in code fences despite instructions.
fn strip_code_fences(content: &str) -> String {
    content
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse generated text into a validated lesson document.
pub(crate) fn parse_lesson(content: &str) -> Result<LessonDocument> {
    let cleaned = strip_code_fences(content);

    let document: LessonDocument = serde_json::from_str(&cleaned).map_err(|e| {
        LessonforgeError::GenerationFailure(format!("endpoint returned unparsable lesson JSON: {}", e))
    })?;

    document.validate()?;

    Ok(document)
}
