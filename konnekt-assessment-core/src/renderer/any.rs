use crate::domain::{Activity, ActivityType, AnswerMap, ItemId, NavigationState};
use crate::renderer::engine::{ItemFeedback, NavigationRequest, RenderChanges};
use crate::renderer::props::RendererProps;
use crate::renderer::{
    FillBlankRenderer, MatchingRenderer, MultipleChoiceRenderer, SentenceBuilderRenderer,
    SpellingRenderer, SpokenResponseRenderer, WordBankRenderer, WrittenResponseRenderer,
};
use std::rc::Rc;

/// A mounted renderer of any format
#[derive(Debug)]
pub enum AnyRenderer {
    MultipleChoice(MultipleChoiceRenderer),
    FillBlank(FillBlankRenderer),
    WordBank(WordBankRenderer),
    SentenceBuilder(SentenceBuilderRenderer),
    Spelling(SpellingRenderer),
    Matching(MatchingRenderer),
    WrittenResponse(WrittenResponseRenderer),
    SpokenResponse(SpokenResponseRenderer),
}

macro_rules! each_renderer {
    ($self:expr, $r:ident => $body:expr) => {
        match $self {
            AnyRenderer::MultipleChoice($r) => $body,
            AnyRenderer::FillBlank($r) => $body,
            AnyRenderer::WordBank($r) => $body,
            AnyRenderer::SentenceBuilder($r) => $body,
            AnyRenderer::Spelling($r) => $body,
            AnyRenderer::Matching($r) => $body,
            AnyRenderer::WrittenResponse($r) => $body,
            AnyRenderer::SpokenResponse($r) => $body,
        }
    };
}

impl AnyRenderer {
    /// Mount the renderer matching the activity's format
    ///
    /// `props` carries everything but the content, which comes from the activity.
    pub fn mount(activity: &Activity, props: RendererProps<()>) -> Self {
        tracing::debug!("Mounting renderer for {}", activity.activity_type());

        match activity {
            Activity::MultipleChoice(c) => {
                AnyRenderer::MultipleChoice(MultipleChoiceRenderer::new(
                    props.with_content(Rc::new(c.clone())),
                ))
            }
            Activity::FillBlank(c) => {
                AnyRenderer::FillBlank(FillBlankRenderer::new(props.with_content(Rc::new(c.clone()))))
            }
            Activity::WordBank(c) => {
                AnyRenderer::WordBank(WordBankRenderer::new(props.with_content(Rc::new(c.clone()))))
            }
            Activity::SentenceBuilder(c) => AnyRenderer::SentenceBuilder(
                SentenceBuilderRenderer::new(props.with_content(Rc::new(c.clone()))),
            ),
            Activity::Spelling(c) => {
                AnyRenderer::Spelling(SpellingRenderer::new(props.with_content(Rc::new(c.clone()))))
            }
            Activity::Matching(c) => {
                AnyRenderer::Matching(MatchingRenderer::new(props.with_content(Rc::new(c.clone()))))
            }
            Activity::WrittenResponse(c) => AnyRenderer::WrittenResponse(
                WrittenResponseRenderer::new(props.with_content(Rc::new(c.clone()))),
            ),
            Activity::SpokenResponse(c) => AnyRenderer::SpokenResponse(
                SpokenResponseRenderer::new(props.with_content(Rc::new(c.clone()))),
            ),
        }
    }

    /// Re-render with fresh props around the content already mounted
    pub fn render(&mut self, props: RendererProps<()>) -> RenderChanges {
        each_renderer!(self, r => {
            let content = Rc::clone(r.content_rc());
            r.render(props.with_content(content))
        })
    }

    pub fn activity_type(&self) -> ActivityType {
        match self {
            AnyRenderer::MultipleChoice(_) => ActivityType::MultipleChoice,
            AnyRenderer::FillBlank(_) => ActivityType::FillBlank,
            AnyRenderer::WordBank(_) => ActivityType::WordBank,
            AnyRenderer::SentenceBuilder(_) => ActivityType::SentenceBuilder,
            AnyRenderer::Spelling(_) => ActivityType::Spelling,
            AnyRenderer::Matching(_) => ActivityType::Matching,
            AnyRenderer::WrittenResponse(_) => ActivityType::WrittenResponse,
            AnyRenderer::SpokenResponse(_) => ActivityType::SpokenResponse,
        }
    }

    pub fn item_ids(&self) -> &[ItemId] {
        each_renderer!(self, r => r.item_ids())
    }

    pub fn answers(&self) -> &AnswerMap {
        each_renderer!(self, r => r.answers())
    }

    pub fn is_answered(&self, item_id: &ItemId) -> bool {
        each_renderer!(self, r => r.is_answered(item_id))
    }

    pub fn current_index(&self) -> usize {
        each_renderer!(self, r => r.current_index())
    }

    pub fn navigation_state(&self) -> NavigationState {
        each_renderer!(self, r => r.navigation_state())
    }

    pub fn feedback(&self, item_id: &ItemId) -> ItemFeedback {
        each_renderer!(self, r => r.feedback(item_id))
    }

    pub fn go_to(&mut self, index: usize) -> NavigationRequest {
        each_renderer!(self, r => r.go_to(index))
    }

    pub fn next(&mut self) -> NavigationRequest {
        each_renderer!(self, r => r.next())
    }

    pub fn previous(&mut self) -> NavigationRequest {
        each_renderer!(self, r => r.previous())
    }

    /// Whether a spoken capture is running
    pub fn is_recording(&self) -> bool {
        match self {
            AnyRenderer::SpokenResponse(r) => r.is_recording(),
            _ => false,
        }
    }

    pub fn as_spoken(&self) -> Option<&SpokenResponseRenderer> {
        match self {
            AnyRenderer::SpokenResponse(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_spoken_mut(&mut self) -> Option<&mut SpokenResponseRenderer> {
        match self {
            AnyRenderer::SpokenResponse(r) => Some(r),
            _ => None,
        }
    }
}
