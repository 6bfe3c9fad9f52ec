use crate::infrastructure::{CliError, Result};
use konnekt_assessment_core::{Activity, AnswerMap, AssessmentConfig, NavigationState, QuestionRecord};
use schemars::schema::RootSchema;
use schemars::schema_for;
use std::path::{Path, PathBuf};

/// Write JSON schemas for the host-facing data shapes into `dir`
pub fn write_schemas(dir: &Path) -> Result<Vec<PathBuf>> {
    if dir.exists() && !dir.is_dir() {
        return Err(CliError::invalid_directory(dir.to_path_buf()));
    }
    std::fs::create_dir_all(dir)?;

    let schemas: [(&str, RootSchema); 5] = [
        ("question_record.json", schema_for!(QuestionRecord)),
        ("activity.json", schema_for!(Activity)),
        ("answer_map.json", schema_for!(AnswerMap)),
        ("navigation_state.json", schema_for!(NavigationState)),
        ("assessment_config.json", schema_for!(AssessmentConfig)),
    ];

    let mut written = Vec::with_capacity(schemas.len());
    for (name, schema) in schemas {
        let json = serde_json::to_string_pretty(&schema)
            .map_err(|e| CliError::SchemaGeneration(format!("{}: {}", name, e)))?;
        let path = dir.join(name);
        std::fs::write(&path, json)?;
        tracing::debug!("Wrote {}", path.display());
        written.push(path);
    }

    tracing::info!("Wrote {} schemas to {}", written.len(), dir.display());
    Ok(written)
}
