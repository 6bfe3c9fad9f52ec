use cucumber::{given, then, when};
use konnekt_assessment_core::dispatch::order_questions;
use konnekt_assessment_core::{AnyRenderer, DispatchResolver, QuestionRecord};
use konnekt_assessment_tests::AssessmentWorld;
use serde_json::{json, Value};
use std::rc::Rc;

fn sample_data(format: &str) -> Value {
    match format {
        "multiple_choice" => json!({
            "question": "Was kauft Jonas?",
            "options": ["Brot", "Milch", "Käse"],
            "answer": "Milch"
        }),
        "matching" => json!({ "word": "der Bahnhof", "definition": "train station", "distractors": ["airport"] }),
        "free_response" => json!({ "prompt": "Beschreibe deine Stadt", "min_words": 20 }),
        _ => json!({}),
    }
}

// ===== Given Steps =====

#[given(expr = "a {string} question {string} in format {string}")]
async fn question(world: &mut AssessmentWorld, skill: String, id: String, format: String) {
    let data = sample_data(&format);
    world
        .questions
        .push(QuestionRecord::new(id, skill, format, data));
}

// ===== When Steps =====

#[when("the questions are resolved")]
async fn questions_resolved(world: &mut AssessmentWorld) {
    let mut resolver = DispatchResolver::default();
    world.resolutions = order_questions(&world.questions)
        .iter()
        .map(|record| resolver.resolve(record))
        .collect();
}

#[when("the assessment starts")]
async fn assessment_starts(world: &mut AssessmentWorld) {
    world.start_assessment(None);
}

#[when("the learner moves to the next question")]
async fn next_question(world: &mut AssessmentWorld) {
    let request = world.assessment_mut().next();
    world.last_request = Some(request);
}

#[when(expr = "the learner answers the current multiple-choice question with option {int}")]
async fn answer_current(world: &mut AssessmentWorld, option: usize) {
    let accepted = world.assessment_mut().with_renderer(|renderer| match renderer {
        AnyRenderer::MultipleChoice(r) => {
            let id = r.current_item_id().cloned().expect("one question mounted");
            r.select_option(&id, option - 1)
        }
        other => panic!("Expected a multiple-choice renderer, got {}", other.activity_type()),
    });
    assert_eq!(accepted, Some(true));
}

#[when("the learner moves away and back")]
async fn away_and_back(world: &mut AssessmentWorld) {
    let current = Rc::clone(
        world
            .assessment()
            .current_resolution()
            .expect("a question is mounted"),
    );
    world.resolutions = vec![current];

    world.assessment_mut().next();
    world.assessment_mut().previous();
}

// ===== Then Steps =====

#[then(expr = "the presentation order is {string}")]
async fn presentation_order(world: &mut AssessmentWorld, expected: String) {
    let order: Vec<&str> = world
        .resolutions
        .iter()
        .map(|r| r.question_id().as_str())
        .collect();
    assert_eq!(order.join(","), expected);
}

#[then(expr = "question {int} uses the {string} renderer")]
async fn question_renderer(world: &mut AssessmentWorld, position: usize, kind: String) {
    let renderer = world.resolutions[position - 1]
        .renderer()
        .map(|kind| kind.as_str());
    assert_eq!(renderer, Some(kind.as_str()));
}

#[then("the two activities differ")]
async fn activities_differ(world: &mut AssessmentWorld) {
    assert_eq!(world.resolutions.len(), 2);
    let first = world.resolutions[0].activity().expect("supported");
    let second = world.resolutions[1].activity().expect("supported");
    assert_ne!(first.activity_type(), second.activity_type());
    assert_ne!(first, second);
}

#[then("the current question is unsupported")]
async fn current_unsupported(world: &mut AssessmentWorld) {
    let assessment = world.assessment();
    let resolution = assessment.current_resolution().expect("a question is mounted");
    assert!(!resolution.is_supported());
    assert!(assessment.renderer().is_none());
}

#[then("the current resolution is reused")]
async fn resolution_reused(world: &mut AssessmentWorld) {
    let current = world
        .assessment()
        .current_resolution()
        .expect("a question is mounted");
    assert!(Rc::ptr_eq(&world.resolutions[0], current));
}
