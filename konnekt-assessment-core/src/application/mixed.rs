use crate::capture::{CaptureDevice, CapturedTake, GuardOutcome, NavigationGuard, WarningChoice};
use crate::config::AssessmentConfig;
use crate::dispatch::{order_questions, DispatchResolver, QuestionRecord, Resolution};
use crate::domain::answer::retain_known;
use crate::domain::navigation::clamp_index;
use crate::domain::{AnswerMap, ItemId, NavigationKey, NavigationState, Timestamp};
use crate::error::CaptureError;
use crate::renderer::{AnyRenderer, NavigationRequest, RenderChanges, RendererCallbacks, RendererProps};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

/// Props of a mixed assessment: the question list plus the usual renderer inputs
pub type MixedAssessmentProps = RendererProps<Vec<QuestionRecord>>;

struct Mounted {
    resolution: Rc<Resolution>,
    /// Answer the renderer was mounted with
    seed: AnswerMap,
    /// `None` for unsupported questions
    renderer: Option<AnyRenderer>,
}

/// Host-facing adapter for a mixed-skill assessment
///
/// Orders the questions, resolves the current one to a single-item activity,
/// mounts the matching renderer and keeps an assessment-wide answer map keyed
/// by question id. Navigation follows the same controlled/self-managed rules
/// as a single renderer, including the recording hold for spoken questions.
pub struct MixedAssessment {
    resolver: DispatchResolver,
    questions: Vec<QuestionRecord>,
    question_ids: Vec<ItemId>,
    answers: AnswerMap,
    seed: Option<AnswerMap>,
    local_index: usize,
    external_index: Option<usize>,
    show_results: bool,
    correct_ids: BTreeSet<ItemId>,
    show_correct_answers: bool,
    callbacks: RendererCallbacks,
    last_published: Option<NavigationKey>,
    mounted: Option<Mounted>,
    guard: NavigationGuard,
    /// Spoken takes of questions whose renderer is no longer mounted
    takes: BTreeMap<ItemId, CapturedTake>,
}

impl MixedAssessment {
    pub fn new(props: MixedAssessmentProps, config: AssessmentConfig) -> Self {
        let callbacks = RendererCallbacks::default();
        props.install_callbacks(&callbacks);

        let questions = order_questions(&props.content);
        let question_ids = Self::ids_of(&questions);
        let answers = Self::seeded(props.initial_answers.as_ref(), &question_ids);

        tracing::info!(
            "Starting mixed assessment with {} questions ({} seeded answers)",
            questions.len(),
            answers.len()
        );

        let mut assessment = Self {
            resolver: DispatchResolver::new(config),
            questions,
            question_ids,
            answers,
            seed: props.initial_answers,
            local_index: 0,
            external_index: props.current_index,
            show_results: props.show_results,
            correct_ids: props.correct_ids,
            show_correct_answers: props.show_correct_answers,
            callbacks,
            last_published: None,
            mounted: None,
            guard: NavigationGuard::default(),
            takes: BTreeMap::new(),
        };
        assessment.mount_current();
        assessment.settle();
        assessment.publish_navigation();
        assessment
    }

    pub fn render(&mut self, mut props: MixedAssessmentProps) -> RenderChanges {
        props.install_callbacks(&self.callbacks);

        let mut changes = RenderChanges::default();
        let questions = order_questions(&props.content);
        let question_ids = Self::ids_of(&questions);

        if question_ids != self.question_ids {
            tracing::debug!(
                "Question set changed ({} -> {}), discarding answers",
                self.question_ids.len(),
                question_ids.len()
            );
            self.mounted = None;
            self.answers = Self::seeded(props.initial_answers.as_ref(), &question_ids);
            self.question_ids = question_ids;
            self.seed = props.initial_answers.clone();
            self.local_index = 0;
            self.last_published = None;
            self.guard = NavigationGuard::default();
            self.takes.clear();
            changes.items_changed = true;
        } else {
            if self.is_recording() {
                if let Some(requested) = props.current_index {
                    self.guard.host_request(requested);
                    props.current_index = Some(self.guard.confirmed());
                }
            }

            if props.initial_answers != self.seed {
                tracing::debug!("Initial answers changed, re-seeding");
                self.mounted = None;
                self.takes.clear();
                self.answers = Self::seeded(props.initial_answers.as_ref(), &self.question_ids);
                self.seed = props.initial_answers.clone();
                changes.reseeded = true;
            }
        }

        self.questions = questions;
        self.external_index = props.current_index;
        self.show_results = props.show_results;
        self.correct_ids = props.correct_ids;
        self.show_correct_answers = props.show_correct_answers;

        self.mount_current();
        self.settle();
        changes.navigation_published = self.publish_navigation();
        changes
    }

    /// Swap the resolver configuration; the current question is re-resolved
    /// when it changed
    pub fn set_config(&mut self, config: AssessmentConfig) -> bool {
        if !self.resolver.set_config(config) {
            return false;
        }
        self.mount_current();
        self.publish_navigation();
        true
    }

    fn ids_of(questions: &[QuestionRecord]) -> Vec<ItemId> {
        questions.iter().map(|q| q.question_id.clone()).collect()
    }

    fn seeded(seed: Option<&AnswerMap>, question_ids: &[ItemId]) -> AnswerMap {
        let mut answers = seed.cloned().unwrap_or_default();
        let dropped = retain_known(&mut answers, question_ids);
        if dropped > 0 {
            tracing::debug!("Dropped {} seeded answers for unknown questions", dropped);
        }
        answers
    }

    // ===== Getters =====

    /// Questions in presentation order
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn question_ids(&self) -> &[ItemId] {
        &self.question_ids
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn resolver(&self) -> &DispatchResolver {
        &self.resolver
    }

    pub fn is_controlled(&self) -> bool {
        self.external_index.is_some()
    }

    pub fn current_index(&self) -> usize {
        clamp_index(
            self.external_index.unwrap_or(self.local_index),
            self.question_ids.len(),
        )
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.questions.get(self.current_index())
    }

    pub fn current_resolution(&self) -> Option<&Rc<Resolution>> {
        self.mounted.as_ref().map(|m| &m.resolution)
    }

    /// Renderer of the current question; `None` when it is unsupported
    pub fn renderer(&self) -> Option<&AnyRenderer> {
        self.mounted.as_ref().and_then(|m| m.renderer.as_ref())
    }

    pub fn is_answered(&self, question_id: &ItemId) -> bool {
        let Some(record) = self.questions.iter().find(|q| &q.question_id == question_id) else {
            return false;
        };
        self.answers
            .get(question_id)
            .map(|answer| self.resolver.is_complete(record, answer))
            .unwrap_or(false)
    }

    pub fn navigation_state(&self) -> NavigationState {
        NavigationState::derive(&self.question_ids, self.current_index(), |index, id| {
            self.answers
                .get(id)
                .map(|answer| self.resolver.is_complete(&self.questions[index], answer))
                .unwrap_or(false)
        })
    }

    // ===== Interaction =====

    /// Run an interaction against the current renderer, then pull its answer
    /// into the assessment
    pub fn with_renderer<R>(&mut self, f: impl FnOnce(&mut AnyRenderer) -> R) -> Option<R> {
        let renderer = self.mounted.as_mut()?.renderer.as_mut()?;
        let result = f(renderer);
        self.sync_answers();
        Some(result)
    }

    pub fn is_recording(&self) -> bool {
        self.renderer()
            .map(AnyRenderer::is_recording)
            .unwrap_or(false)
    }

    pub async fn start_recording(
        &mut self,
        device: &dyn CaptureDevice,
        now: Timestamp,
    ) -> Result<bool, CaptureError> {
        let spoken = self
            .mounted
            .as_mut()
            .and_then(|m| m.renderer.as_mut())
            .and_then(AnyRenderer::as_spoken_mut);

        match spoken {
            Some(spoken) => spoken.start_recording(device, now).await,
            None => Ok(false),
        }
    }

    pub fn stop_recording(&mut self, now: Timestamp) -> bool {
        self.with_renderer(|r| {
            r.as_spoken_mut()
                .map(|spoken| spoken.stop_recording(now))
                .unwrap_or(false)
        })
        .unwrap_or(false)
    }

    /// Forward the clock to a running capture
    pub fn tick(&mut self, now: Timestamp) -> bool {
        self.with_renderer(|r| {
            r.as_spoken_mut()
                .map(|spoken| spoken.tick(now))
                .unwrap_or(false)
        })
        .unwrap_or(false)
    }

    // ===== Navigation =====

    pub fn go_to(&mut self, index: usize) -> NavigationRequest {
        if index >= self.question_ids.len() || index == self.current_index() {
            return NavigationRequest::Ignored;
        }

        if self.is_recording() {
            self.guard.hold(index);
            return NavigationRequest::Held;
        }

        if self.is_controlled() {
            tracing::debug!("Requesting host question change to {}", index);
            self.callbacks.on_index_change.emit(index);
            return NavigationRequest::Requested(index);
        }

        self.local_index = index;
        self.mount_current();
        self.settle();
        self.publish_navigation();
        NavigationRequest::Moved(index)
    }

    pub fn next(&mut self) -> NavigationRequest {
        self.go_to(self.current_index() + 1)
    }

    pub fn previous(&mut self) -> NavigationRequest {
        match self.current_index().checked_sub(1) {
            Some(index) => self.go_to(index),
            None => NavigationRequest::Ignored,
        }
    }

    pub fn pending_navigation(&self) -> Option<usize> {
        self.guard.pending()
    }

    pub fn is_warning_shown(&self) -> bool {
        self.guard.is_warning()
    }

    pub fn resolve_warning(&mut self, choice: WarningChoice, now: Timestamp) -> Option<GuardOutcome> {
        let held_by_host = self.guard.is_host_request();
        let outcome = self.guard.resolve(choice)?;

        match outcome {
            GuardOutcome::Navigate(target) => {
                self.stop_recording(now);

                if !self.is_controlled() {
                    self.local_index = target;
                } else if held_by_host {
                    self.external_index = Some(target);
                } else {
                    self.callbacks.on_index_change.emit(target);
                }

                self.mount_current();
                self.settle();
                self.publish_navigation();
            }
            GuardOutcome::Revert(confirmed) => {
                if held_by_host {
                    tracing::info!("Asking host to return to question {}", confirmed);
                    self.callbacks.on_index_change.emit(confirmed);
                }
            }
        }

        Some(outcome)
    }

    // ===== Internals =====

    /// Keep the mounted renderer in step with the current question
    ///
    /// The renderer is only replaced when the resolution changes identity.
    fn mount_current(&mut self) {
        let index = self.current_index();
        let Some(record) = self.questions.get(index) else {
            self.mounted = None;
            return;
        };

        let resolution = self.resolver.resolve(record);

        if let Some(mounted) = &mut self.mounted {
            if Rc::ptr_eq(&mounted.resolution, &resolution) {
                if let Some(renderer) = &mut mounted.renderer {
                    renderer.render(Self::inner_props(
                        &mounted.seed,
                        self.show_results,
                        &self.correct_ids,
                        self.show_correct_answers,
                    ));
                }
                return;
            }
        }

        self.stash_takes();

        let question_id = resolution.question_id().clone();
        let seed: AnswerMap = self
            .answers
            .get(&question_id)
            .map(|answer| AnswerMap::from([(question_id.clone(), answer.clone())]))
            .unwrap_or_default();

        let mut renderer = resolution.activity().map(|activity| {
            AnyRenderer::mount(
                activity,
                Self::inner_props(
                    &seed,
                    self.show_results,
                    &self.correct_ids,
                    self.show_correct_answers,
                ),
            )
        });

        if let Some(spoken) = renderer.as_mut().and_then(AnyRenderer::as_spoken_mut) {
            if let Some(take) = self.takes.get(&question_id) {
                tracing::debug!("Restoring take for question {}", question_id);
                spoken.restore_take(take.clone());
            }
        }

        if renderer.is_none() {
            tracing::info!("Question {} is unsupported, showing notice", question_id);
        }

        self.mounted = Some(Mounted {
            resolution,
            seed,
            renderer,
        });
    }

    /// Keep the mounted spoken renderer's takes before it is replaced
    fn stash_takes(&mut self) {
        let Some(spoken) = self
            .mounted
            .as_ref()
            .and_then(|m| m.renderer.as_ref())
            .and_then(AnyRenderer::as_spoken)
        else {
            return;
        };

        for item_id in spoken.item_ids() {
            match spoken.take(item_id) {
                Some(take) => {
                    self.takes.insert(item_id.clone(), take.clone());
                }
                None => {
                    self.takes.remove(item_id);
                }
            }
        }
    }

    fn inner_props(
        seed: &AnswerMap,
        show_results: bool,
        correct_ids: &BTreeSet<ItemId>,
        show_correct_answers: bool,
    ) -> RendererProps<()> {
        let mut props = RendererProps::new(())
            .with_initial_answers(seed.clone())
            .with_correct_answers_shown(show_correct_answers);
        if show_results {
            props = props.with_results(correct_ids.iter().cloned());
        }
        props
    }

    /// Copy the current question's answer out of its renderer
    fn sync_answers(&mut self) -> bool {
        let Some((question_id, inner)) = self.mounted.as_ref().and_then(|m| {
            let renderer = m.renderer.as_ref()?;
            let id = m.resolution.question_id();
            Some((id.clone(), renderer.answers().get(id).cloned()))
        }) else {
            return false;
        };

        let changed = match inner {
            Some(value) => {
                if self.answers.get(&question_id) == Some(&value) {
                    false
                } else {
                    self.answers.insert(question_id, value);
                    true
                }
            }
            None => self.answers.remove(&question_id).is_some(),
        };

        if changed {
            self.callbacks.on_answers_change.emit(self.answers.clone());
            self.publish_navigation();
        }
        changed
    }

    fn settle(&mut self) {
        if !self.is_recording() {
            self.guard.confirm(self.current_index());
        }
    }

    fn publish_navigation(&mut self) -> bool {
        let state = self.navigation_state();
        let key = state.key();

        if self.last_published.as_ref() == Some(&key) {
            return false;
        }

        self.last_published = Some(key);
        self.callbacks.on_navigation_change.emit(state);
        true
    }
}

impl fmt::Debug for MixedAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixedAssessment")
            .field("question_ids", &self.question_ids)
            .field("answers", &self.answers)
            .field("current_index", &self.current_index())
            .field("controlled", &self.is_controlled())
            .field("renderer", &self.renderer().map(AnyRenderer::activity_type))
            .finish()
    }
}
