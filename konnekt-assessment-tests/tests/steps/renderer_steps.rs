use cucumber::{given, then, when};
use konnekt_assessment_core::{Activity, AnyRenderer, ItemId};
use konnekt_assessment_tests::AssessmentWorld;
use serde_json::json;

fn choice_activity(count: usize) -> Activity {
    let questions: Vec<_> = (1..=count)
        .map(|i| {
            json!({
                "id": format!("q{}", i),
                "prompt": format!("Frage {}", i),
                "options": ["der", "die", "das"],
                "correct_index": 0
            })
        })
        .collect();

    serde_json::from_value(json!({ "type": "multiple_choice", "content": { "questions": questions } }))
        .expect("valid multiple-choice activity")
}

fn words(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

// ===== Given Steps =====

#[given(expr = "a multiple-choice activity with {int} questions")]
async fn multiple_choice_activity(world: &mut AssessmentWorld, count: usize) {
    world.mount(choice_activity(count), None);
}

#[given(expr = "a multiple-choice activity with {int} questions controlled at index {int}")]
async fn controlled_multiple_choice_activity(world: &mut AssessmentWorld, count: usize, index: usize) {
    world.mount(choice_activity(count), Some(index));
}

#[given(expr = "a sentence-builder item {string} expecting {int} words {string}")]
async fn sentence_builder_item(world: &mut AssessmentWorld, id: String, count: usize, answer: String) {
    let answer = words(&answer);
    let mut tiles = answer.clone();
    tiles.reverse();

    let activity: Activity = serde_json::from_value(json!({
        "type": "sentence_builder",
        "content": {
            "items": [{
                "id": id,
                "prompt": "Bilde einen Satz",
                "words": tiles,
                "target_word_count": count,
                "answer": answer
            }]
        }
    }))
    .expect("valid sentence-builder activity");

    world.mount(activity, None);
}

// ===== When Steps =====

#[when(expr = "the learner picks option {int} for {string}")]
async fn pick_option(world: &mut AssessmentWorld, option: usize, id: String) {
    match world.renderer_mut() {
        AnyRenderer::MultipleChoice(r) => {
            assert!(r.select_option(&ItemId::from(id), option - 1));
        }
        other => panic!("Expected a multiple-choice renderer, got {}", other.activity_type()),
    }
}

#[when(expr = "the learner taps {string} for {string}")]
async fn tap_words(world: &mut AssessmentWorld, list: String, id: String) {
    let item = ItemId::from(id);
    match world.renderer_mut() {
        AnyRenderer::SentenceBuilder(r) => {
            for word in words(&list) {
                assert!(r.tap_word(&item, &word), "tile {:?} was not accepted", word);
            }
        }
        other => panic!("Expected a sentence builder, got {}", other.activity_type()),
    }
}

#[when(expr = "the learner removes word {int} from {string}")]
async fn remove_word(world: &mut AssessmentWorld, position: usize, id: String) {
    match world.renderer_mut() {
        AnyRenderer::SentenceBuilder(r) => {
            assert!(r.remove_word_at(&ItemId::from(id), position - 1));
        }
        other => panic!("Expected a sentence builder, got {}", other.activity_type()),
    }
}

#[when("the host renders again without changes")]
async fn rerender(world: &mut AssessmentWorld) {
    let props = world.host_props.clone().expect("No renderer mounted");
    world.renderer_mut().render(props);
}

#[when("the learner moves to the next item")]
async fn next_item(world: &mut AssessmentWorld) {
    let request = world.renderer_mut().next();
    world.last_request = Some(request);
}

#[when(expr = "the host renders index {int}")]
async fn host_renders_index(world: &mut AssessmentWorld, index: usize) {
    world.host_renders_index(index);
}

// ===== Then Steps =====

#[then(expr = "the answered indices are {string}")]
async fn answered_indices(world: &mut AssessmentWorld, expected: String) {
    let expected: Vec<usize> = words(&expected)
        .iter()
        .map(|i| i.parse().expect("numeric index"))
        .collect();

    assert_eq!(world.host.last_navigation().answered_indices, expected);
}

#[then(expr = "the host received {int} answer update(s)")]
async fn answer_updates(world: &mut AssessmentWorld, count: usize) {
    assert_eq!(world.host.answers.borrow().len(), count);
}

#[then(expr = "the host received {int} navigation update(s)")]
async fn navigation_updates(world: &mut AssessmentWorld, count: usize) {
    assert_eq!(world.host.navigation.borrow().len(), count);
}

#[then(expr = "item {string} is answered")]
async fn item_answered(world: &mut AssessmentWorld, id: String) {
    assert!(world.renderer().is_answered(&ItemId::from(id)));
}

#[then(expr = "item {string} is not answered")]
async fn item_not_answered(world: &mut AssessmentWorld, id: String) {
    assert!(!world.renderer().is_answered(&ItemId::from(id)));
}

#[then(expr = "item {string} holds {int} words")]
async fn item_holds_words(world: &mut AssessmentWorld, id: String, count: usize) {
    match world.renderer() {
        AnyRenderer::SentenceBuilder(r) => {
            assert_eq!(r.placed_words(&ItemId::from(id)).len(), count);
        }
        other => panic!("Expected a sentence builder, got {}", other.activity_type()),
    }
}

#[then(expr = "the renderer asked the host for index {int}")]
async fn asked_host(world: &mut AssessmentWorld, index: usize) {
    assert_eq!(world.host.index_requests.borrow().last(), Some(&index));
}

#[then(expr = "the current index is {int}")]
async fn current_index(world: &mut AssessmentWorld, index: usize) {
    assert_eq!(world.renderer().current_index(), index);
    assert_eq!(world.host.last_navigation().current_index, index);
}
