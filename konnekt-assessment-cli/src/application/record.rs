use crate::infrastructure::{CliError, Result};
use konnekt_assessment_core::{
    AnswerMap, AssessmentConfig, CaptureDevice, ItemId, MixedAssessment, QuestionRecord,
    RendererProps, Timestamp,
};

/// Record one take for a spoken question and return the resulting answers
///
/// The take lasts `duration_ms` on the assessment clock; a duration past the
/// question's limit is cut at the limit.
pub async fn record_take(
    questions: Vec<QuestionRecord>,
    question_id: &ItemId,
    device: &dyn CaptureDevice,
    duration_ms: u64,
    config: AssessmentConfig,
) -> Result<AnswerMap> {
    let mut assessment = MixedAssessment::new(RendererProps::new(questions), config);

    let index = assessment
        .question_ids()
        .iter()
        .position(|id| id == question_id)
        .ok_or_else(|| CliError::UnknownQuestion(question_id.to_string()))?;

    assessment.go_to(index);

    let started = Timestamp::from_millis(0);
    if !assessment.start_recording(device, started).await? {
        return Err(CliError::NotSpoken(question_id.to_string()));
    }

    let stopped = Timestamp::from_millis(duration_ms);
    if !assessment.tick(stopped) {
        assessment.stop_recording(stopped);
    }

    tracing::info!("Recorded {} ms for question {}", duration_ms, question_id);
    Ok(assessment.answers().clone())
}
