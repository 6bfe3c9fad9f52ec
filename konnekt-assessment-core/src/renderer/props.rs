use crate::domain::{AnswerMap, ItemId, NavigationState};
use crate::renderer::observer::{Callback, RendererCallbacks};
use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

/// Inputs a renderer receives on every render
pub struct RendererProps<C> {
    /// Activity content; identity is judged by the item ids it declares
    pub content: Rc<C>,
    pub on_answers_change: Option<Callback<AnswerMap>>,
    pub show_results: bool,
    pub correct_ids: BTreeSet<ItemId>,
    /// Saved answers to resume from
    pub initial_answers: Option<AnswerMap>,
    pub show_correct_answers: bool,
    /// Host-controlled index; `None` means the renderer manages its own
    pub current_index: Option<usize>,
    pub on_index_change: Option<Callback<usize>>,
    pub on_navigation_change: Option<Callback<NavigationState>>,
}

impl<C> RendererProps<C> {
    pub fn new(content: C) -> Self {
        Self::from_rc(Rc::new(content))
    }

    pub fn from_rc(content: Rc<C>) -> Self {
        Self {
            content,
            on_answers_change: None,
            show_results: false,
            correct_ids: BTreeSet::new(),
            initial_answers: None,
            show_correct_answers: false,
            current_index: None,
            on_index_change: None,
            on_navigation_change: None,
        }
    }

    pub fn with_on_answers_change(mut self, f: impl Fn(AnswerMap) + 'static) -> Self {
        self.on_answers_change = Some(Rc::new(f));
        self
    }

    pub fn with_initial_answers(mut self, answers: AnswerMap) -> Self {
        self.initial_answers = Some(answers);
        self
    }

    pub fn with_current_index(mut self, index: usize) -> Self {
        self.current_index = Some(index);
        self
    }

    pub fn with_on_index_change(mut self, f: impl Fn(usize) + 'static) -> Self {
        self.on_index_change = Some(Rc::new(f));
        self
    }

    pub fn with_on_navigation_change(mut self, f: impl Fn(NavigationState) + 'static) -> Self {
        self.on_navigation_change = Some(Rc::new(f));
        self
    }

    /// Show per-item results against the given correct ids
    pub fn with_results<I>(mut self, correct_ids: I) -> Self
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.show_results = true;
        self.correct_ids = correct_ids.into_iter().collect();
        self
    }

    pub fn with_correct_answers_shown(mut self, show: bool) -> Self {
        self.show_correct_answers = show;
        self
    }

    /// Same props around other content
    pub fn with_content<D>(self, content: Rc<D>) -> RendererProps<D> {
        RendererProps {
            content,
            on_answers_change: self.on_answers_change,
            show_results: self.show_results,
            correct_ids: self.correct_ids,
            initial_answers: self.initial_answers,
            show_correct_answers: self.show_correct_answers,
            current_index: self.current_index,
            on_index_change: self.on_index_change,
            on_navigation_change: self.on_navigation_change,
        }
    }

    pub(crate) fn install_callbacks(&self, callbacks: &RendererCallbacks) {
        callbacks
            .on_answers_change
            .replace(self.on_answers_change.clone());
        callbacks.on_index_change.replace(self.on_index_change.clone());
        callbacks
            .on_navigation_change
            .replace(self.on_navigation_change.clone());
    }
}

impl<C> Clone for RendererProps<C> {
    fn clone(&self) -> Self {
        Self {
            content: Rc::clone(&self.content),
            on_answers_change: self.on_answers_change.clone(),
            show_results: self.show_results,
            correct_ids: self.correct_ids.clone(),
            initial_answers: self.initial_answers.clone(),
            show_correct_answers: self.show_correct_answers,
            current_index: self.current_index,
            on_index_change: self.on_index_change.clone(),
            on_navigation_change: self.on_navigation_change.clone(),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for RendererProps<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererProps")
            .field("content", &self.content)
            .field("show_results", &self.show_results)
            .field("correct_ids", &self.correct_ids)
            .field("initial_answers", &self.initial_answers)
            .field("show_correct_answers", &self.show_correct_answers)
            .field("current_index", &self.current_index)
            .finish_non_exhaustive()
    }
}
