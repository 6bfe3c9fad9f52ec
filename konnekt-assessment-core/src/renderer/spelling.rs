use crate::audio::AudioSource;
use crate::domain::encoding::{decode_letters, encode_letters};
use crate::domain::format::Spelling;
use crate::domain::{AnswerValue, ItemId};
use crate::renderer::engine::{AnswerChange, RendererEngine};

pub type SpellingRenderer = RendererEngine<Spelling>;

impl RendererEngine<Spelling> {
    pub fn placed_letters(&self, item_id: &ItemId) -> Vec<char> {
        self.answer(item_id)
            .and_then(AnswerValue::as_text)
            .map(decode_letters)
            .unwrap_or_default()
    }

    /// Letter slots of the item
    pub fn slot_count(&self, item_id: &ItemId) -> usize {
        self.item(item_id).map(|item| item.target_len()).unwrap_or(0)
    }

    /// Tiles not yet placed; a tile offered twice can be placed twice
    ///
    /// Items without explicit tiles offer the letters of the word.
    pub fn available_letters(&self, item_id: &ItemId) -> Vec<char> {
        let Some(item) = self.item(item_id) else {
            return Vec::new();
        };

        let tiles: Vec<char> = if item.letters.is_empty() {
            item.word.chars().collect()
        } else {
            item.letters.clone()
        };

        let mut placed = self.placed_letters(item_id);
        let mut available = Vec::new();
        for tile in tiles {
            match placed.iter().position(|p| *p == tile) {
                Some(pos) => {
                    placed.remove(pos);
                }
                None => available.push(tile),
            }
        }
        available
    }

    /// Place a letter in the next free slot; ignored once every slot is
    /// filled or when no unused tile carries the letter
    pub fn place_letter(&mut self, item_id: &ItemId, letter: char) -> bool {
        let slots = self.slot_count(item_id);
        let mut placed = self.placed_letters(item_id);

        if placed.len() >= slots {
            tracing::debug!("All {} slots of {} are filled", slots, item_id);
            return false;
        }

        if !self.available_letters(item_id).contains(&letter) {
            tracing::debug!("Letter {:?} is not available for {}", letter, item_id);
            return false;
        }

        placed.push(letter);
        self.store(item_id, &placed)
    }

    pub fn remove_last_letter(&mut self, item_id: &ItemId) -> bool {
        let mut placed = self.placed_letters(item_id);
        if placed.pop().is_none() {
            return false;
        }
        self.store(item_id, &placed)
    }

    pub fn clear(&mut self, item_id: &ItemId) -> bool {
        self.update_answer(item_id, AnswerChange::Clear)
    }

    pub fn item_audio(&self, item_id: &ItemId) -> Option<&AudioSource> {
        self.item(item_id).and_then(|item| item.audio.as_ref())
    }

    fn store(&mut self, item_id: &ItemId, placed: &[char]) -> bool {
        let change = if placed.is_empty() {
            AnswerChange::Clear
        } else {
            AnswerChange::Set(AnswerValue::Text(encode_letters(placed)))
        };
        self.update_answer(item_id, change)
    }
}
