use crate::domain::encoding::is_match_correct;
use crate::domain::format::Matching;
use crate::domain::{AnswerValue, ItemId};
use crate::renderer::engine::{AnswerChange, RendererEngine};

pub type MatchingRenderer = RendererEngine<Matching>;

impl RendererEngine<Matching> {
    /// Definition chosen for a pair
    pub fn matched_definition(&self, pair_id: &ItemId) -> Option<ItemId> {
        self.answer(pair_id)
            .and_then(AnswerValue::as_text)
            .map(ItemId::from)
    }

    /// Pair currently holding a definition
    pub fn pair_holding(&self, definition_id: &ItemId) -> Option<ItemId> {
        self.answers()
            .iter()
            .find(|(_, value)| value.as_text() == Some(definition_id.as_str()))
            .map(|(pair, _)| pair.clone())
    }

    /// Attach a definition to a pair
    ///
    /// A definition belongs to one pair at a time: taking it from another pair
    /// clears that pair in the same mutation.
    pub fn match_definition(&mut self, pair_id: &ItemId, definition_id: &ItemId) -> bool {
        if !self.content().has_definition(definition_id) {
            tracing::debug!("Unknown definition {} for pair {}", definition_id, pair_id);
            return false;
        }
        if self.item(pair_id).is_none() {
            tracing::debug!("match_definition on unknown pair {}", pair_id);
            return false;
        }

        let mut changes = Vec::new();
        if let Some(holder) = self.pair_holding(definition_id) {
            if &holder != pair_id {
                changes.push((holder, AnswerChange::Clear));
            }
        }
        changes.push((
            pair_id.clone(),
            AnswerChange::Set(AnswerValue::text(definition_id.as_str())),
        ));

        self.update_answers(changes)
    }

    pub fn unmatch(&mut self, pair_id: &ItemId) -> bool {
        self.update_answer(pair_id, AnswerChange::Clear)
    }

    pub fn is_pair_correct(&self, pair_id: &ItemId) -> bool {
        self.answer(pair_id)
            .map(|answer| is_match_correct(pair_id, answer))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Definition, MatchingContent, MatchingPair};
    use crate::renderer::{ItemFeedback, RendererProps};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn content() -> MatchingContent {
        MatchingContent {
            pairs: vec![
                MatchingPair {
                    id: "p1".into(),
                    word: "der Hund".to_string(),
                    definition: "dog".to_string(),
                },
                MatchingPair {
                    id: "p2".into(),
                    word: "die Katze".to_string(),
                    definition: "cat".to_string(),
                },
            ],
            distractors: vec![Definition {
                id: "d1".into(),
                text: "horse".to_string(),
            }],
        }
    }

    #[test]
    fn test_match_and_correctness() {
        let mut renderer = MatchingRenderer::new(RendererProps::new(content()));

        renderer.match_definition(&"p1".into(), &"p1".into());
        renderer.match_definition(&"p2".into(), &"d1".into());

        assert!(renderer.is_pair_correct(&"p1".into()));
        assert!(!renderer.is_pair_correct(&"p2".into()));
        assert_eq!(renderer.navigation_state().answered_indices, vec![0, 1]);
    }

    #[test]
    fn test_definition_moves_between_pairs_in_one_flush() {
        let flushes = Rc::new(RefCell::new(Vec::new()));
        let sink = flushes.clone();
        let props = RendererProps::new(content())
            .with_on_answers_change(move |answers| sink.borrow_mut().push(answers));
        let mut renderer = MatchingRenderer::new(props);

        renderer.match_definition(&"p1".into(), &"d1".into());
        renderer.match_definition(&"p2".into(), &"d1".into());

        assert_eq!(flushes.borrow().len(), 2);
        let last = flushes.borrow().last().cloned().unwrap();
        assert!(!last.contains_key(&ItemId::from("p1")));
        assert_eq!(renderer.pair_holding(&"d1".into()), Some("p2".into()));
    }

    #[test]
    fn test_unknown_definition_ignored() {
        let mut renderer = MatchingRenderer::new(RendererProps::new(content()));
        assert!(!renderer.match_definition(&"p1".into(), &"zz".into()));
        assert!(!renderer.unmatch(&"p1".into()));
    }

    #[test]
    fn test_feedback_uses_pair_check() {
        let mut renderer =
            MatchingRenderer::new(RendererProps::new(content()).with_results(Vec::new()));
        renderer.match_definition(&"p2".into(), &"p2".into());
        renderer.match_definition(&"p1".into(), &"d1".into());

        assert_eq!(renderer.feedback(&"p2".into()), ItemFeedback::Correct);
        assert_eq!(renderer.feedback(&"p1".into()), ItemFeedback::Incorrect);
    }
}
