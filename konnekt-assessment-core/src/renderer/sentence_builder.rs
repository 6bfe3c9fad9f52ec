use crate::audio::AudioSource;
use crate::domain::encoding::{encode_word_sequence, word_sequence_of};
use crate::domain::format::SentenceBuilder;
use crate::domain::{AnswerValue, ItemId};
use crate::renderer::engine::{AnswerChange, RendererEngine};

pub type SentenceBuilderRenderer = RendererEngine<SentenceBuilder>;

impl RendererEngine<SentenceBuilder> {
    /// Words placed so far, in order
    pub fn placed_words(&self, item_id: &ItemId) -> Vec<String> {
        word_sequence_of(self.answer(item_id))
    }

    /// Tiles still available, keeping duplicates that were not placed yet
    pub fn available_words(&self, item_id: &ItemId) -> Vec<String> {
        let Some(item) = self.item(item_id) else {
            return Vec::new();
        };

        let mut placed = self.placed_words(item_id);
        let mut available = Vec::new();
        for word in &item.words {
            match placed.iter().position(|p| p == word) {
                Some(pos) => {
                    placed.remove(pos);
                }
                None => available.push(word.clone()),
            }
        }
        available
    }

    /// Append a tile; taps past the target count or on used tiles are ignored
    pub fn tap_word(&mut self, item_id: &ItemId, word: &str) -> bool {
        let Some(target) = self.item(item_id).map(|item| item.target_len()) else {
            tracing::debug!("tap_word on unknown item {}", item_id);
            return false;
        };

        let mut placed = self.placed_words(item_id);
        if placed.len() >= target {
            tracing::debug!("Item {} already holds {} words", item_id, target);
            return false;
        }

        if !self.available_words(item_id).iter().any(|w| w == word) {
            tracing::debug!("Word {:?} is not available for {}", word, item_id);
            return false;
        }

        placed.push(word.to_string());
        self.store(item_id, &placed)
    }

    /// Remove the word at a position, shifting later words left
    pub fn remove_word_at(&mut self, item_id: &ItemId, position: usize) -> bool {
        let mut placed = self.placed_words(item_id);
        if position >= placed.len() {
            return false;
        }
        placed.remove(position);
        self.store(item_id, &placed)
    }

    pub fn clear(&mut self, item_id: &ItemId) -> bool {
        self.update_answer(item_id, AnswerChange::Clear)
    }

    pub fn item_audio(&self, item_id: &ItemId) -> Option<&AudioSource> {
        self.item(item_id).and_then(|item| item.audio.as_ref())
    }

    fn store(&mut self, item_id: &ItemId, placed: &[String]) -> bool {
        let change = if placed.is_empty() {
            AnswerChange::Clear
        } else {
            AnswerChange::Set(AnswerValue::Text(encode_word_sequence(placed)))
        };
        self.update_answer(item_id, change)
    }
}
