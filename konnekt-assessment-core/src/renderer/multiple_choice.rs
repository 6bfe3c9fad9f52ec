use crate::audio::AudioSource;
use crate::domain::format::MultipleChoice;
use crate::domain::{AnswerValue, ItemId};
use crate::renderer::engine::{AnswerChange, RendererEngine};

pub type MultipleChoiceRenderer = RendererEngine<MultipleChoice>;

impl RendererEngine<MultipleChoice> {
    /// Select an option; out-of-range indexes are ignored
    pub fn select_option(&mut self, item_id: &ItemId, option_index: usize) -> bool {
        let Some(question) = self.item(item_id) else {
            tracing::debug!("select_option on unknown item {}", item_id);
            return false;
        };

        if option_index >= question.options.len() {
            tracing::debug!(
                "Option {} out of range for {} ({} options)",
                option_index,
                item_id,
                question.options.len()
            );
            return false;
        }

        self.update_answer(item_id, AnswerChange::Set(AnswerValue::Index(option_index)))
    }

    pub fn selected_option(&self, item_id: &ItemId) -> Option<usize> {
        self.answer(item_id).and_then(AnswerValue::as_index)
    }

    pub fn question_audio(&self, item_id: &ItemId) -> Option<&AudioSource> {
        self.item(item_id).and_then(|q| q.audio.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioClip, PlaybackState};
    use crate::domain::{ChoiceQuestion, MultipleChoiceContent, NavigationState};
    use crate::renderer::RendererProps;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn content() -> MultipleChoiceContent {
        MultipleChoiceContent {
            questions: ["q1", "q2", "q3"]
                .iter()
                .map(|id| ChoiceQuestion {
                    id: (*id).into(),
                    prompt: "Welcher Artikel?".to_string(),
                    options: vec!["der".into(), "die".into(), "das".into()],
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_answers_in_any_order_mark_all_indices() {
        let published: Rc<RefCell<Vec<NavigationState>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = published.clone();
        let props = RendererProps::new(content())
            .with_on_navigation_change(move |state| sink.borrow_mut().push(state));
        let mut renderer = MultipleChoiceRenderer::new(props);

        renderer.select_option(&"q2".into(), 0);
        renderer.select_option(&"q1".into(), 1);
        renderer.select_option(&"q3".into(), 2);

        let last = published.borrow().last().cloned().unwrap();
        assert_eq!(last.answered_indices, vec![0, 1, 2]);
        assert_eq!(
            last.answered_item_ids,
            vec![ItemId::from("q1"), ItemId::from("q2"), ItemId::from("q3")]
        );
    }

    #[test]
    fn test_out_of_range_option_ignored() {
        let mut renderer = MultipleChoiceRenderer::new(RendererProps::new(content()));

        assert!(!renderer.select_option(&"q1".into(), 3));
        assert!(renderer.answers().is_empty());
    }

    #[test]
    fn test_reselecting_same_option_does_not_flush() {
        let flushes = Rc::new(RefCell::new(0));
        let sink = flushes.clone();
        let props =
            RendererProps::new(content()).with_on_answers_change(move |_| *sink.borrow_mut() += 1);
        let mut renderer = MultipleChoiceRenderer::new(props);

        renderer.select_option(&"q1".into(), 1);
        renderer.select_option(&"q1".into(), 1);
        renderer.select_option(&"q1".into(), 2);

        assert_eq!(*flushes.borrow(), 2);
        assert_eq!(renderer.selected_option(&"q1".into()), Some(2));
    }

    fn listening_content() -> MultipleChoiceContent {
        MultipleChoiceContent {
            questions: ["l1", "l2"]
                .iter()
                .map(|id| ChoiceQuestion {
                    id: (*id).into(),
                    prompt: "Was hörst du?".to_string(),
                    options: vec!["Zug".into(), "Bus".into()],
                    audio: Some(AudioSource::Ready {
                        url: format!("https://cdn.example.org/{}.mp3", id),
                    }),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_item_change_discards_in_flight_audio() {
        let mut renderer = MultipleChoiceRenderer::new(RendererProps::new(listening_content()));

        let (ticket, url) = renderer.audio_mut().begin_play().unwrap();
        assert_eq!(url, "https://cdn.example.org/l1.mp3");

        renderer.next();

        let clip = AudioClip {
            url,
            mime_type: "audio/mpeg".to_string(),
            bytes: vec![1, 2, 3],
        };
        assert!(!renderer.audio_mut().complete_play(ticket, Ok(clip)));
        assert_eq!(renderer.audio().state(), &PlaybackState::Idle);
        assert_eq!(
            renderer.audio().source().and_then(AudioSource::url),
            Some("https://cdn.example.org/l2.mp3")
        );
    }
}
