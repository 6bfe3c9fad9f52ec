use cucumber::{given, then, when};
use konnekt_assessment_core::{Activity, CaptureError, ItemId, WarningChoice};
use konnekt_assessment_tests::AssessmentWorld;
use serde_json::json;

fn spoken_activity(count: usize) -> Activity {
    let prompts: Vec<_> = (1..=count)
        .map(|i| json!({ "id": format!("p{}", i), "prompt": "Erzähl von deinem Wochenende" }))
        .collect();

    serde_json::from_value(json!({ "type": "spoken_response", "content": { "prompts": prompts } }))
        .expect("valid spoken-response activity")
}

async fn start_recording(world: &mut AssessmentWorld) -> Result<bool, CaptureError> {
    let now = world.now();
    let AssessmentWorld {
        renderer,
        microphone,
        ..
    } = world;

    let spoken = renderer
        .as_mut()
        .and_then(|r| r.as_spoken_mut())
        .expect("No spoken-response renderer mounted");
    spoken.start_recording(&*microphone, now).await
}

// ===== Given Steps =====

#[given(expr = "a spoken-response activity with {int} prompts")]
async fn spoken_response_activity(world: &mut AssessmentWorld, count: usize) {
    world.mount(spoken_activity(count), None);
}

#[given(expr = "a spoken-response activity with {int} prompts controlled at index {int}")]
async fn controlled_spoken_response_activity(world: &mut AssessmentWorld, count: usize, index: usize) {
    world.mount(spoken_activity(count), Some(index));
}

#[given("the learner is recording")]
async fn learner_is_recording(world: &mut AssessmentWorld) {
    assert_eq!(start_recording(world).await, Ok(true));
    assert!(world.renderer().is_recording());
}

#[given("the microphone is denied")]
async fn microphone_denied(world: &mut AssessmentWorld) {
    world.microphone.denied = true;
}

// ===== When Steps =====

#[when("the learner starts recording")]
async fn learner_starts_recording(world: &mut AssessmentWorld) {
    let result = start_recording(world).await;
    world.last_error = result.err();
}

#[when(expr = "{int} ms pass")]
async fn time_passes(world: &mut AssessmentWorld, ms: u64) {
    let now = world.advance_clock(ms);
    if let Some(spoken) = world.renderer_mut().as_spoken_mut() {
        spoken.tick(now);
    }
}

#[when("the learner chooses to keep recording")]
async fn keep_recording(world: &mut AssessmentWorld) {
    resolve(world, WarningChoice::KeepRecording);
}

#[when("the learner chooses to stop and navigate")]
async fn stop_and_navigate(world: &mut AssessmentWorld) {
    resolve(world, WarningChoice::StopAndNavigate);
}

fn resolve(world: &mut AssessmentWorld, choice: WarningChoice) {
    let now = world.now();
    let outcome = world
        .renderer_mut()
        .as_spoken_mut()
        .expect("No spoken-response renderer mounted")
        .resolve_warning(choice, now);

    assert!(outcome.is_some(), "No warning was pending");
    world.last_outcome = outcome;
}

// ===== Then Steps =====

#[then("a recording warning is shown")]
async fn warning_shown(world: &mut AssessmentWorld) {
    let spoken = world.renderer().as_spoken().expect("No spoken-response renderer mounted");
    assert!(spoken.is_warning_shown());
}

#[then(expr = "navigation to index {int} is pending")]
async fn navigation_pending(world: &mut AssessmentWorld, index: usize) {
    let spoken = world.renderer().as_spoken().expect("No spoken-response renderer mounted");
    assert_eq!(spoken.pending_navigation(), Some(index));
}

#[then("the learner is still recording")]
async fn still_recording(world: &mut AssessmentWorld) {
    let spoken = world.renderer().as_spoken().expect("No spoken-response renderer mounted");
    assert!(spoken.is_recording());
    assert!(!spoken.is_warning_shown());
}

#[then(expr = "the microphone was released {int} time(s)")]
async fn microphone_released(world: &mut AssessmentWorld, count: u32) {
    assert_eq!(world.microphone.released.get(), count);
}

#[then(expr = "the take for {string} lasts {int} ms")]
async fn take_duration(world: &mut AssessmentWorld, id: String, ms: u64) {
    let spoken = world.renderer().as_spoken().expect("No spoken-response renderer mounted");
    let take = spoken.take(&ItemId::from(id)).expect("No take recorded");
    assert_eq!(take.duration_ms, ms);
}

#[then("the capture failed with permission denied")]
async fn permission_denied(world: &mut AssessmentWorld) {
    assert_eq!(world.last_error, Some(CaptureError::PermissionDenied));
    let spoken = world.renderer().as_spoken().expect("No spoken-response renderer mounted");
    assert!(!spoken.is_recording());
}
