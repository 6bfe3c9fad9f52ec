use crate::audio::AudioPlayback;
use crate::domain::answer::retain_known;
use crate::domain::navigation::clamp_index;
use crate::domain::{AnswerFormat, AnswerMap, AnswerValue, ItemId, NavigationKey, NavigationState};
use crate::renderer::observer::RendererCallbacks;
use crate::renderer::props::RendererProps;
use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Result state of one item while results are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFeedback {
    /// Results are not being shown
    Hidden,
    Correct,
    Incorrect,
    Unanswered,
}

/// Outcome of a previous/next/jump action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationRequest {
    /// Self-managed index moved
    Moved(usize),
    /// Host asked to move; the index changes once it flows back in
    Requested(usize),
    /// A capture is running; a confirmation warning was raised
    Held,
    /// Out of range or already there
    Ignored,
}

/// What a render call changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderChanges {
    /// New item set: answers and derived state were discarded
    pub items_changed: bool,
    /// Initial answers changed and were re-applied
    pub reseeded: bool,
    pub navigation_published: bool,
}

pub(crate) enum AnswerChange {
    Set(AnswerValue),
    Clear,
}

/// Synchronization core shared by every format renderer
///
/// Owns the local answer map for one item set, decides the displayed index,
/// flushes answer copies upward and publishes [`NavigationState`] when it
/// meaningfully changes. Format-specific interactions are inherent methods
/// on `RendererEngine<Format>`.
pub struct RendererEngine<F: AnswerFormat> {
    content: Rc<F::Content>,
    item_ids: Vec<ItemId>,
    answers: AnswerMap,
    seed: Option<AnswerMap>,
    local_index: usize,
    external_index: Option<usize>,
    show_results: bool,
    correct_ids: BTreeSet<ItemId>,
    show_correct_answers: bool,
    callbacks: RendererCallbacks,
    last_published: Option<NavigationKey>,
    /// Player for the displayed item's audio
    audio: AudioPlayback,
    audio_item: Option<ItemId>,
    _format: PhantomData<F>,
}

impl<F: AnswerFormat> RendererEngine<F> {
    /// First render
    pub fn new(props: RendererProps<F::Content>) -> Self {
        let callbacks = RendererCallbacks::default();
        props.install_callbacks(&callbacks);

        let item_ids = F::item_ids(&props.content);
        let answers = Self::seeded(props.initial_answers.as_ref(), &item_ids);

        tracing::debug!(
            "Mounting {} renderer with {} items ({} seeded answers)",
            F::ACTIVITY_TYPE,
            item_ids.len(),
            answers.len()
        );

        let mut engine = Self {
            content: props.content,
            item_ids,
            answers,
            seed: props.initial_answers,
            local_index: 0,
            external_index: props.current_index,
            show_results: props.show_results,
            correct_ids: props.correct_ids,
            show_correct_answers: props.show_correct_answers,
            callbacks,
            last_published: None,
            audio: AudioPlayback::default(),
            audio_item: None,
            _format: PhantomData,
        };
        engine.sync_audio();
        engine.publish_navigation();
        engine
    }

    /// Subsequent render with fresh props
    pub fn render(&mut self, props: RendererProps<F::Content>) -> RenderChanges {
        // Observer identity is not data: swap in place, never notify for it.
        props.install_callbacks(&self.callbacks);

        let mut changes = RenderChanges::default();
        let item_ids = F::item_ids(&props.content);

        if item_ids != self.item_ids {
            tracing::debug!(
                "{} item set changed ({} -> {} items), discarding local answers",
                F::ACTIVITY_TYPE,
                self.item_ids.len(),
                item_ids.len()
            );
            self.answers = Self::seeded(props.initial_answers.as_ref(), &item_ids);
            self.item_ids = item_ids;
            self.seed = props.initial_answers;
            self.local_index = 0;
            self.last_published = None;
            changes.items_changed = true;
        } else if props.initial_answers != self.seed {
            tracing::debug!("{} initial answers changed, re-seeding", F::ACTIVITY_TYPE);
            self.answers = Self::seeded(props.initial_answers.as_ref(), &self.item_ids);
            self.seed = props.initial_answers;
            changes.reseeded = true;
        }

        self.content = props.content;
        self.external_index = props.current_index;
        self.show_results = props.show_results;
        self.correct_ids = props.correct_ids;
        self.show_correct_answers = props.show_correct_answers;

        self.sync_audio();
        changes.navigation_published = self.publish_navigation();
        changes
    }

    fn seeded(seed: Option<&AnswerMap>, item_ids: &[ItemId]) -> AnswerMap {
        let mut answers = seed.cloned().unwrap_or_default();
        let dropped = retain_known(&mut answers, item_ids);
        if dropped > 0 {
            tracing::debug!("Dropped {} seeded answers for unknown items", dropped);
        }
        answers
    }

    // ===== Getters =====

    pub fn content(&self) -> &F::Content {
        &self.content
    }

    pub fn items(&self) -> &[F::Item] {
        F::items(&self.content)
    }

    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    pub fn item(&self, item_id: &ItemId) -> Option<&F::Item> {
        self.items().iter().find(|item| F::item_id(item) == item_id)
    }

    pub fn item_at(&self, index: usize) -> Option<&F::Item> {
        self.items().get(index)
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    pub fn answer(&self, item_id: &ItemId) -> Option<&AnswerValue> {
        self.answers.get(item_id)
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn is_controlled(&self) -> bool {
        self.external_index.is_some()
    }

    /// Displayed index: the host's when controlled, otherwise the local one
    pub fn current_index(&self) -> usize {
        clamp_index(
            self.external_index.unwrap_or(self.local_index),
            self.item_ids.len(),
        )
    }

    pub fn current_item(&self) -> Option<&F::Item> {
        self.item_at(self.current_index())
    }

    pub fn current_item_id(&self) -> Option<&ItemId> {
        self.item_ids.get(self.current_index())
    }

    pub fn is_answered(&self, item_id: &ItemId) -> bool {
        match (self.item(item_id), self.answers.get(item_id)) {
            (Some(item), Some(answer)) => F::is_complete(answer, item),
            _ => false,
        }
    }

    pub fn navigation_state(&self) -> NavigationState {
        NavigationState::for_format::<F>(&self.content, &self.answers, self.current_index())
    }

    pub fn callbacks(&self) -> &RendererCallbacks {
        &self.callbacks
    }

    /// Audio of the displayed item (listening prompt, dictation, model answer)
    pub fn audio(&self) -> &AudioPlayback {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioPlayback {
        &mut self.audio
    }

    // ===== Results =====

    pub fn feedback(&self, item_id: &ItemId) -> ItemFeedback {
        if !self.show_results {
            return ItemFeedback::Hidden;
        }

        let Some(item) = self.item(item_id) else {
            return ItemFeedback::Hidden;
        };

        match self.answers.get(item_id) {
            None => ItemFeedback::Unanswered,
            Some(answer) => {
                let correct = self.correct_ids.contains(item_id)
                    || F::is_correct(answer, item).unwrap_or(false);
                if correct {
                    ItemFeedback::Correct
                } else {
                    ItemFeedback::Incorrect
                }
            }
        }
    }

    /// Reference answer, only while correct answers are shown
    pub fn revealed_answer(&self, item_id: &ItemId) -> Option<AnswerValue> {
        if !self.show_correct_answers {
            return None;
        }
        self.item(item_id)
            .and_then(|item| F::reference_answer(&self.content, item))
    }

    // ===== Navigation =====

    pub fn go_to(&mut self, index: usize) -> NavigationRequest {
        if index >= self.item_ids.len() || index == self.current_index() {
            return NavigationRequest::Ignored;
        }

        if self.is_controlled() {
            tracing::debug!("Requesting host index change to {}", index);
            self.callbacks.on_index_change.emit(index);
            NavigationRequest::Requested(index)
        } else {
            self.local_index = index;
            self.sync_audio();
            self.publish_navigation();
            NavigationRequest::Moved(index)
        }
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

    // ===== Mutation =====

    /// Apply one answer change, flush a copy upward, then re-derive navigation
    ///
    /// Returns false (and flushes nothing) for unknown items or no-op changes.
    pub(crate) fn update_answer(&mut self, item_id: &ItemId, change: AnswerChange) -> bool {
        self.update_answers(vec![(item_id.clone(), change)])
    }

    /// Apply several changes as one mutation: a single flush, a single publish
    pub(crate) fn update_answers(&mut self, changes: Vec<(ItemId, AnswerChange)>) -> bool {
        let mut changed = false;

        for (item_id, change) in changes {
            if !self.item_ids.contains(&item_id) {
                tracing::debug!("Ignoring answer for unknown item {}", item_id);
                continue;
            }

            changed |= match change {
                AnswerChange::Set(value) => {
                    if self.answers.get(&item_id) == Some(&value) {
                        false
                    } else {
                        self.answers.insert(item_id, value);
                        true
                    }
                }
                AnswerChange::Clear => self.answers.remove(&item_id).is_some(),
            };
        }

        if changed {
            self.callbacks.on_answers_change.emit(self.answers.clone());
            self.publish_navigation();
        }
        changed
    }

    /// Publish the navigation state if its key differs from the last one
    pub(crate) fn publish_navigation(&mut self) -> bool {
        let state = self.navigation_state();
        let key = state.key();

        if self.last_published.as_ref() == Some(&key) {
            return false;
        }

        self.last_published = Some(key);
        self.callbacks.on_navigation_change.emit(state);
        true
    }

    /// Override the host index without a render, used once a held navigation is accepted
    pub(crate) fn set_external_index(&mut self, index: Option<usize>) {
        self.external_index = index;
        self.sync_audio();
        self.publish_navigation();
    }

    /// Point the player at the displayed item's audio
    ///
    /// Moving to another item stops playback and invalidates in-flight fetches.
    fn sync_audio(&mut self) {
        let current = self.current_item_id().cloned();
        if current != self.audio_item {
            self.audio.stop();
            self.audio_item = current;
        }

        let source = self.current_item().and_then(F::item_audio).cloned();
        self.audio.set_source(source);
    }

    pub(crate) fn content_rc(&self) -> &Rc<F::Content> {
        &self.content
    }
}

impl<F: AnswerFormat> fmt::Debug for RendererEngine<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererEngine")
            .field("activity_type", &F::ACTIVITY_TYPE)
            .field("item_ids", &self.item_ids)
            .field("answers", &self.answers)
            .field("current_index", &self.current_index())
            .field("controlled", &self.is_controlled())
            .finish()
    }
}
