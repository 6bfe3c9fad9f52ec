//! Per-format renderers
//!
//! Every format shares [`RendererEngine`]: it owns the local answer map,
//! decides the displayed index and reports upward through
//! [`RendererCallbacks`]. Format modules add the interactions that produce
//! answers.

mod any;
mod engine;
mod fill_blank;
mod matching;
mod multiple_choice;
mod observer;
mod props;
mod sentence_builder;
mod spelling;
mod spoken_response;
mod word_bank;
mod written_response;

pub use any::AnyRenderer;
pub use engine::{ItemFeedback, NavigationRequest, RenderChanges, RendererEngine};
pub use fill_blank::FillBlankRenderer;
pub use matching::MatchingRenderer;
pub use multiple_choice::MultipleChoiceRenderer;
pub use observer::{callback, Callback, ObserverHandle, RendererCallbacks};
pub use props::RendererProps;
pub use sentence_builder::SentenceBuilderRenderer;
pub use spelling::SpellingRenderer;
pub use spoken_response::SpokenResponseRenderer;
pub use word_bank::WordBankRenderer;
pub use written_response::WrittenResponseRenderer;
