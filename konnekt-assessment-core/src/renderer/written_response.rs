use crate::domain::encoding::SUBMITTED_SENTINEL;
use crate::domain::format::WrittenResponse;
use crate::domain::{AnswerValue, ItemId};
use crate::renderer::engine::{AnswerChange, RendererEngine};

pub type WrittenResponseRenderer = RendererEngine<WrittenResponse>;

impl RendererEngine<WrittenResponse> {
    pub fn set_response(&mut self, item_id: &ItemId, text: &str) -> bool {
        if self.is_submitted(item_id) {
            tracing::debug!("Response {} already submitted", item_id);
            return false;
        }

        let change = if text.trim().is_empty() {
            AnswerChange::Clear
        } else {
            AnswerChange::Set(AnswerValue::text(text))
        };
        self.update_answer(item_id, change)
    }

    pub fn response(&self, item_id: &ItemId) -> Option<&str> {
        self.answer(item_id)
            .and_then(AnswerValue::as_text)
            .filter(|text| *text != SUBMITTED_SENTINEL)
    }

    pub fn word_count(&self, item_id: &ItemId) -> usize {
        self.response(item_id)
            .map(|text| text.split_whitespace().count())
            .unwrap_or(0)
    }

    /// Whether the draft reaches the item's minimum word count
    pub fn can_submit(&self, item_id: &ItemId) -> bool {
        let Some(prompt) = self.item(item_id) else {
            return false;
        };
        let words = self.word_count(item_id);
        words > 0 && words >= prompt.min_words.unwrap_or(1)
    }

    /// Replace the draft with the submitted marker
    pub fn submit(&mut self, item_id: &ItemId) -> bool {
        if !self.can_submit(item_id) {
            tracing::debug!("Response {} not ready for submission", item_id);
            return false;
        }
        self.update_answer(
            item_id,
            AnswerChange::Set(AnswerValue::text(SUBMITTED_SENTINEL)),
        )
    }

    pub fn is_submitted(&self, item_id: &ItemId) -> bool {
        self.answer(item_id).and_then(AnswerValue::as_text) == Some(SUBMITTED_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{WrittenPrompt, WrittenResponseContent};
    use crate::renderer::RendererProps;

    fn content() -> WrittenResponseContent {
        WrittenResponseContent {
            prompts: vec![WrittenPrompt {
                id: "w1".into(),
                prompt: "Beschreibe deinen Tag.".to_string(),
                min_words: Some(3),
                sample_answer: None,
            }],
        }
    }

    #[test]
    fn test_draft_counts_as_answered() {
        let mut renderer = WrittenResponseRenderer::new(RendererProps::new(content()));
        renderer.set_response(&"w1".into(), "Heute");

        assert!(renderer.is_answered(&"w1".into()));
        assert!(!renderer.can_submit(&"w1".into()));
    }

    #[test]
    fn test_submit_stores_sentinel() {
        let mut renderer = WrittenResponseRenderer::new(RendererProps::new(content()));
        let id = ItemId::from("w1");
        renderer.set_response(&id, "Heute war ich im Park");

        assert!(renderer.submit(&id));
        assert!(renderer.is_submitted(&id));
        assert_eq!(renderer.answer(&id), Some(&AnswerValue::text(SUBMITTED_SENTINEL)));
        assert_eq!(renderer.response(&id), None);
        assert!(!renderer.set_response(&id, "anders"));
    }
}
