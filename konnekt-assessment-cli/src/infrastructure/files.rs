use crate::infrastructure::{CliError, Result};
use konnekt_assessment_core::{AnswerMap, AssessmentConfig, QuestionRecord};
use serde::Deserialize;
use std::path::Path;

/// Accepted question file shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum QuestionFile {
    List(Vec<QuestionRecord>),
    Wrapped { questions: Vec<QuestionRecord> },
}

/// Load questions from a JSON list or a `{ "questions": [...] }` object
pub fn load_questions(path: &Path) -> Result<Vec<QuestionRecord>> {
    let raw = std::fs::read_to_string(path)?;
    let file: QuestionFile = serde_json::from_str(&raw)
        .map_err(|e| CliError::invalid_questions(path.to_path_buf(), e.to_string()))?;

    let questions = match file {
        QuestionFile::List(questions) | QuestionFile::Wrapped { questions } => questions,
    };

    if let Some(blank) = questions.iter().find(|q| q.question_id.as_str().trim().is_empty()) {
        return Err(CliError::invalid_questions(
            path.to_path_buf(),
            format!("question with format {:?} has no id", blank.format_slug),
        ));
    }

    tracing::info!("Loaded {} questions from {}", questions.len(), path.display());
    Ok(questions)
}

/// Load a saved answer map keyed by question id
pub fn load_answers(path: &Path) -> Result<AnswerMap> {
    let raw = std::fs::read_to_string(path)?;
    let answers: AnswerMap = serde_json::from_str(&raw)?;
    tracing::debug!("Loaded {} answers from {}", answers.len(), path.display());
    Ok(answers)
}

/// Load the resolver configuration, falling back to defaults
///
/// Environment overrides apply in both cases.
pub fn load_config(path: Option<&Path>) -> Result<AssessmentConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            AssessmentConfig::from_json_str(&raw)?
        }
        None => AssessmentConfig::default(),
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("konnekt-assess-files-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_plain_list() {
        let path = scratch(
            "list.json",
            r#"[{ "question_id": "q1", "skill_slug": "grammar", "format_slug": "fill_blank" }]"#,
        );
        let questions = load_questions(&path).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].skill_slug, "grammar");
    }

    #[test]
    fn test_load_wrapped_list() {
        let path = scratch(
            "wrapped.json",
            r#"{ "questions": [{ "question_id": "q1", "format_slug": "matching" }] }"#,
        );
        let questions = load_questions(&path).unwrap();
        assert_eq!(questions[0].format_slug, "matching");
        assert_eq!(questions[0].skill_slug, "");
    }

    #[test]
    fn test_blank_id_is_rejected() {
        let path = scratch("blank.json", r#"[{ "question_id": " ", "format_slug": "matching" }]"#);
        assert!(matches!(
            load_questions(&path),
            Err(CliError::InvalidQuestionFile { .. })
        ));
    }

    #[test]
    fn test_load_answers() {
        let path = scratch("answers.json", r#"{ "q1": 2, "q2": "der Hund" }"#);
        let answers = load_answers(&path).unwrap();
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn test_bad_endpoint_is_rejected() {
        let path = scratch("config.json", r#"{ "synthesis_endpoint": "not a url" }"#);
        assert!(matches!(load_config(Some(&path)), Err(CliError::Config(_))));
    }
}
