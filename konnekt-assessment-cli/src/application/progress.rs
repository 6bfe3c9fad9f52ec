use konnekt_assessment_core::dispatch::resolve;
use konnekt_assessment_core::{
    AnswerMap, AssessmentConfig, ItemId, MixedAssessment, NavigationState, QuestionRecord,
    RendererProps,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Progress of a saved assessment as a host would display it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub navigation: NavigationState,
    /// Questions no renderer can show
    pub unsupported: Vec<ItemId>,
    /// Saved answers that were dropped because their question is gone
    pub orphaned_answers: Vec<ItemId>,
    pub complete: bool,
}

/// Mount the assessment with saved answers and report what it publishes
pub fn progress_report(
    questions: Vec<QuestionRecord>,
    answers: AnswerMap,
    index: Option<usize>,
    config: AssessmentConfig,
) -> ProgressReport {
    let published = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&published);

    let mut props = RendererProps::new(questions)
        .with_initial_answers(answers.clone())
        .with_on_navigation_change(move |state| *sink.borrow_mut() = Some(state));
    if let Some(index) = index {
        props = props.with_current_index(index);
    }

    let assessment = MixedAssessment::new(props, config);

    let orphaned_answers = answers
        .keys()
        .filter(|id| !assessment.answers().contains_key(*id))
        .cloned()
        .collect();

    let resolver = assessment.resolver();
    let unsupported = assessment
        .questions()
        .iter()
        .filter(|record| !resolve(record, resolver.table(), resolver.config()).is_supported())
        .map(|record| record.question_id.clone())
        .collect();

    let navigation = published
        .borrow_mut()
        .take()
        .unwrap_or_else(|| assessment.navigation_state());

    ProgressReport {
        complete: navigation.is_complete(),
        navigation,
        unsupported,
        orphaned_answers,
    }
}
