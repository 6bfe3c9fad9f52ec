use crate::audio::AudioSource;
use crate::domain::format::FillBlank;
use crate::domain::{AnswerValue, ItemId};
use crate::renderer::engine::{AnswerChange, RendererEngine};

pub type FillBlankRenderer = RendererEngine<FillBlank>;

impl RendererEngine<FillBlank> {
    /// Store the typed text; blank text removes the entry
    pub fn set_text(&mut self, item_id: &ItemId, text: &str) -> bool {
        let change = if text.trim().is_empty() {
            AnswerChange::Clear
        } else {
            AnswerChange::Set(AnswerValue::text(text))
        };
        self.update_answer(item_id, change)
    }

    pub fn text(&self, item_id: &ItemId) -> &str {
        self.answer(item_id)
            .and_then(AnswerValue::as_text)
            .unwrap_or_default()
    }

    pub fn hint(&self, item_id: &ItemId) -> Option<&str> {
        self.item(item_id).and_then(|item| item.hint.as_deref())
    }

    pub fn item_audio(&self, item_id: &ItemId) -> Option<&AudioSource> {
        self.item(item_id).and_then(|item| item.audio.as_ref())
    }
}
