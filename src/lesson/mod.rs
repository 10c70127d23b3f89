use serde::{Deserialize, Serialize};

use crate::{LessonforgeError, Result};

pub mod generator;

pub use generator::LessonGenerator;

/// One slide of lesson content, kept in reading order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonItem {
    pub id: String,

    #[serde(flatten)]
    pub content: LessonContent,
}

/// Closed set of slide shapes the generator may produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum LessonContent {
    Story(StorySegment),
    Quiz(QuizItem),
    Match(MatchExercise),
}

/// A bilingual narrative segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySegment {
    pub english: String,
    pub chinese: String,

    /// Audio-reference placeholder emitted by the generator
    pub audio: String,
}

/// A multiple-choice question about the story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub options: Vec<String>,

    /// Must be string-equal to exactly one entry in `options`
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,

    pub explanation: String,
}

/// A term/translation matching game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchExercise {
    pub pairs: Vec<MatchPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPair {
    pub id: String,
    pub left: String,
    pub right: String,
}

/// A generated lesson: an ordered sequence of items, serialized as a
/// top-level JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonDocument {
    pub items: Vec<LessonItem>,
}

impl LessonDocument {
    /// Reject documents the generator was instructed never to produce.
    ///
    /// The endpoint is prompted to keep every quiz answer inside its
    /// options; a reply violating that is treated as a generation failure
    /// rather than silently accepted.
    pub fn validate(&self) -> Result<()> {
        for item in &self.items {
            if let LessonContent::Quiz(quiz) = &item.content {
                if !quiz.options.iter().any(|option| option == &quiz.correct_answer) {
                    return Err(LessonforgeError::GenerationFailure(format!(
                        "quiz item '{}' has a correct answer that matches none of its options",
                        item.id
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY_JSON: &str = r#"[{"id":"s1","type":"story","content":{"english":"Hello world.","chinese":"你好，世界。","audio":"mock_audio_generated"}}]"#;

    fn quiz_item(correct_answer: &str) -> LessonItem {
        LessonItem {
            id: "q1".to_string(),
            content: LessonContent::Quiz(QuizItem {
                question: "What does “legit” mean?".to_string(),
                options: vec!["real".to_string(), "expensive".to_string()],
                correct_answer: correct_answer.to_string(),
                explanation: "Slang for genuine.".to_string(),
            }),
        }
    }

    #[test]
    fn deserializes_tagged_story_item() {
        let document: LessonDocument = serde_json::from_str(STORY_JSON).unwrap();

        assert_eq!(document.items.len(), 1);
        assert_eq!(document.items[0].id, "s1");
        match &document.items[0].content {
            LessonContent::Story(story) => {
                assert_eq!(story.english, "Hello world.");
                assert_eq!(story.chinese, "你好，世界。");
                assert_eq!(story.audio, "mock_audio_generated");
            }
            other => panic!("expected story content, got {:?}", other),
        }
    }

    #[test]
    fn serializes_with_id_type_content_keys() {
        let document: LessonDocument = serde_json::from_str(STORY_JSON).unwrap();

        let json = serde_json::to_string(&document).unwrap();

        assert_eq!(json, STORY_JSON);
    }

    #[test]
    fn preserves_item_order_through_round_trip() {
        let json = r#"[
            {"id":"s1","type":"story","content":{"english":"One.","chinese":"一。","audio":"a1"}},
            {"id":"q1","type":"quiz","content":{"question":"?","options":["One.","Two."],"correctAnswer":"One.","explanation":"e"}},
            {"id":"m1","type":"match","content":{"pairs":[{"id":"p1","left":"one","right":"一"}]}},
            {"id":"s2","type":"story","content":{"english":"Two.","chinese":"二。","audio":"a2"}}
        ]"#;

        let document: LessonDocument = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = document.items.iter().map(|item| item.id.as_str()).collect();

        assert_eq!(ids, ["s1", "q1", "m1", "s2"]);

        let reparsed: LessonDocument =
            serde_json::from_str(&serde_json::to_string(&document).unwrap()).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn validate_accepts_answer_present_in_options() {
        let document = LessonDocument {
            items: vec![quiz_item("real")],
        };

        assert!(document.validate().is_ok());
    }

    #[test]
    fn validate_rejects_answer_missing_from_options() {
        let document = LessonDocument {
            items: vec![quiz_item("genuine")],
        };

        let err = document.validate().unwrap_err();

        assert!(matches!(
            err.downcast_ref::<LessonforgeError>(),
            Some(LessonforgeError::GenerationFailure(_))
        ));
    }

    #[test]
    fn rejects_unknown_variant_tag() {
        let json = r#"[{"id":"x1","type":"poem","content":{}}]"#;

        assert!(serde_json::from_str::<LessonDocument>(json).is_err());
    }
}
