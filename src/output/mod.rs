use std::path::{Path, PathBuf};

use crate::lesson::LessonDocument;
use crate::utils::sanitize_filename;
use crate::{LessonforgeError, Result};

/// Deterministic lesson file name: `lesson_{video stem}.json` inside `dir`.
pub fn lesson_output_path(dir: &Path, video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("video");

    dir.join(format!("lesson_{}.json", sanitize_filename(stem)))
}

/// Write the lesson document as human-readable UTF-8 JSON.
pub fn save_lesson(document: &LessonDocument, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document).map_err(|e| {
        LessonforgeError::PersistenceFailure(format!("could not serialize lesson: {}", e))
    })?;

    fs_err::write(path, json).map_err(|e| {
        LessonforgeError::PersistenceFailure(format!("could not write {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_derives_from_video_stem() {
        let path = lesson_output_path(Path::new("/tmp/out"), Path::new("/videos/lecture.mp4"));

        assert_eq!(path, Path::new("/tmp/out/lesson_lecture.json"));
    }

    #[test]
    fn output_name_sanitizes_awkward_stems() {
        let path = lesson_output_path(Path::new("."), Path::new("my/talk?2024.mp4"));

        assert_eq!(path, Path::new("./lesson_talk_2024.json"));
    }

    #[test]
    fn saved_lesson_is_pretty_printed_and_reparsable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lesson_test.json");
        let document: LessonDocument = serde_json::from_str(
            r#"[{"id":"s1","type":"story","content":{"english":"Hello world.","chinese":"你好，世界。","audio":"mock_audio_generated"}}]"#,
        )
        .unwrap();

        save_lesson(&document, &path).unwrap();

        let written = fs_err::read_to_string(&path).unwrap();
        assert!(written.contains("\n"));
        assert!(written.contains("你好，世界。"));
        let reparsed: LessonDocument = serde_json::from_str(&written).unwrap();
        assert_eq!(reparsed, document);
    }
}
