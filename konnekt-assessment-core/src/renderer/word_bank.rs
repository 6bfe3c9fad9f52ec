use crate::domain::format::WordBank;
use crate::domain::{AnswerValue, ItemId};
use crate::renderer::engine::{AnswerChange, RendererEngine};

pub type WordBankRenderer = RendererEngine<WordBank>;

impl RendererEngine<WordBank> {
    /// Words offered for an item (its own options, else the shared bank)
    pub fn options(&self, item_id: &ItemId) -> &[String] {
        match self.item(item_id) {
            Some(item) => self.content().options_for(item),
            None => &[],
        }
    }

    /// Select a word; selecting the selected word again deselects it
    pub fn toggle_word(&mut self, item_id: &ItemId, word: &str) -> bool {
        if !self.options(item_id).iter().any(|w| w == word) {
            tracing::debug!("Word {:?} is not offered for {}", word, item_id);
            return false;
        }

        let change = if self.selected_word(item_id) == Some(word) {
            AnswerChange::Clear
        } else {
            AnswerChange::Set(AnswerValue::text(word))
        };
        self.update_answer(item_id, change)
    }

    pub fn selected_word(&self, item_id: &ItemId) -> Option<&str> {
        self.answer(item_id).and_then(AnswerValue::as_text)
    }
}
