use konnekt_assessment_core::dispatch::order_questions;
use konnekt_assessment_core::{
    AssessmentConfig, AudioSource, DispatchResolver, ItemId, QuestionRecord, RendererKind,
};
use serde::Serialize;
use std::fmt;

/// One row of the dispatch report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedQuestion {
    pub position: usize,
    pub question_id: ItemId,
    pub skill_slug: String,
    pub format_slug: String,
    /// `None` when no renderer handles the format
    pub renderer: Option<RendererKind>,
    pub audio: Vec<AudioSource>,
}

impl fmt::Display for ResolvedQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let renderer = self
            .renderer
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "unsupported".to_string());

        write!(
            f,
            "{:>3}  {:<12} {:<14} {:<18} -> {}",
            self.position + 1,
            self.question_id,
            self.skill_slug,
            self.format_slug,
            renderer
        )?;

        for source in &self.audio {
            match source.url() {
                Some(url) => write!(f, "\n       audio: {}", url)?,
                None => write!(f, "\n       audio: pending")?,
            }
        }
        Ok(())
    }
}

/// Order the questions and resolve each one
pub fn resolve_report(questions: &[QuestionRecord], config: AssessmentConfig) -> Vec<ResolvedQuestion> {
    let mut resolver = DispatchResolver::new(config);

    order_questions(questions)
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let resolution = resolver.resolve(record);
            ResolvedQuestion {
                position,
                question_id: record.question_id.clone(),
                skill_slug: record.skill_slug.clone(),
                format_slug: record.format_slug.clone(),
                renderer: resolution.renderer(),
                audio: resolution
                    .activity()
                    .map(|activity| activity.audio_sources().into_iter().cloned().collect())
                    .unwrap_or_default(),
            }
        })
        .collect()
}
