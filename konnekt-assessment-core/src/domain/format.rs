use crate::audio::AudioSource;
use crate::domain::activity::{
    BlankItem, ChoiceQuestion, FillBlankContent, MatchingContent, MatchingPair,
    MultipleChoiceContent, SentenceBuilderContent, SentenceItem, SpellingContent, SpellingItem,
    SpokenPrompt, SpokenResponseContent, WordBankContent, WordBankItem, WrittenPrompt,
    WrittenResponseContent,
};
use crate::domain::encoding;
use crate::domain::{ActivityType, AnswerValue, ItemId};

/// Static description of one question format
///
/// Implementors are zero-sized markers; a renderer is generic over them.
pub trait AnswerFormat: 'static {
    type Content: Clone + PartialEq + std::fmt::Debug;
    type Item: Clone + PartialEq + std::fmt::Debug;

    const ACTIVITY_TYPE: ActivityType;

    /// Items in declared order
    fn items(content: &Self::Content) -> &[Self::Item];

    fn item_id(item: &Self::Item) -> &ItemId;

    /// Whether a stored answer counts as "answered"
    fn is_complete(answer: &AnswerValue, item: &Self::Item) -> bool;

    /// Format-local correctness, when the format can decide it without a key
    fn is_correct(_answer: &AnswerValue, _item: &Self::Item) -> Option<bool> {
        None
    }

    /// Reference answer shown when correct answers are revealed
    fn reference_answer(_content: &Self::Content, _item: &Self::Item) -> Option<AnswerValue> {
        None
    }

    /// Audio attached to an item
    fn item_audio(_item: &Self::Item) -> Option<&AudioSource> {
        None
    }

    fn item_ids(content: &Self::Content) -> Vec<ItemId> {
        Self::items(content)
            .iter()
            .map(|item| Self::item_id(item).clone())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultipleChoice;

impl AnswerFormat for MultipleChoice {
    type Content = MultipleChoiceContent;
    type Item = ChoiceQuestion;

    const ACTIVITY_TYPE: ActivityType = ActivityType::MultipleChoice;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.questions
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn item_audio(item: &Self::Item) -> Option<&AudioSource> {
        item.audio.as_ref()
    }

    fn is_complete(_answer: &AnswerValue, _item: &Self::Item) -> bool {
        true
    }

    fn reference_answer(_content: &Self::Content, item: &Self::Item) -> Option<AnswerValue> {
        item.correct_index.map(AnswerValue::Index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillBlank;

impl AnswerFormat for FillBlank {
    type Content = FillBlankContent;
    type Item = BlankItem;

    const ACTIVITY_TYPE: ActivityType = ActivityType::FillBlank;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.items
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn item_audio(item: &Self::Item) -> Option<&AudioSource> {
        item.audio.as_ref()
    }

    fn is_complete(answer: &AnswerValue, _item: &Self::Item) -> bool {
        encoding::is_filled_text(answer)
    }

    fn reference_answer(_content: &Self::Content, item: &Self::Item) -> Option<AnswerValue> {
        item.answer.clone().map(AnswerValue::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordBank;

impl AnswerFormat for WordBank {
    type Content = WordBankContent;
    type Item = WordBankItem;

    const ACTIVITY_TYPE: ActivityType = ActivityType::WordBank;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.items
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn is_complete(_answer: &AnswerValue, _item: &Self::Item) -> bool {
        true
    }

    fn reference_answer(_content: &Self::Content, item: &Self::Item) -> Option<AnswerValue> {
        item.answer.clone().map(AnswerValue::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceBuilder;

impl AnswerFormat for SentenceBuilder {
    type Content = SentenceBuilderContent;
    type Item = SentenceItem;

    const ACTIVITY_TYPE: ActivityType = ActivityType::SentenceBuilder;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.items
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn item_audio(item: &Self::Item) -> Option<&AudioSource> {
        item.audio.as_ref()
    }

    fn is_complete(answer: &AnswerValue, item: &Self::Item) -> bool {
        encoding::is_word_sequence_complete(answer, item.target_len())
    }

    fn reference_answer(_content: &Self::Content, item: &Self::Item) -> Option<AnswerValue> {
        if item.answer.is_empty() {
            None
        } else {
            Some(AnswerValue::Text(encoding::encode_word_sequence(
                &item.answer,
            )))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spelling;

impl AnswerFormat for Spelling {
    type Content = SpellingContent;
    type Item = SpellingItem;

    const ACTIVITY_TYPE: ActivityType = ActivityType::Spelling;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.items
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn item_audio(item: &Self::Item) -> Option<&AudioSource> {
        item.audio.as_ref()
    }

    fn is_complete(answer: &AnswerValue, item: &Self::Item) -> bool {
        encoding::is_spelling_complete(answer, item.target_len())
    }

    fn reference_answer(_content: &Self::Content, item: &Self::Item) -> Option<AnswerValue> {
        if item.word.is_empty() {
            None
        } else {
            Some(AnswerValue::Text(item.word.clone()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matching;

impl AnswerFormat for Matching {
    type Content = MatchingContent;
    type Item = MatchingPair;

    const ACTIVITY_TYPE: ActivityType = ActivityType::Matching;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.pairs
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn is_complete(_answer: &AnswerValue, _item: &Self::Item) -> bool {
        true
    }

    fn is_correct(answer: &AnswerValue, item: &Self::Item) -> Option<bool> {
        Some(encoding::is_match_correct(&item.id, answer))
    }

    fn reference_answer(_content: &Self::Content, item: &Self::Item) -> Option<AnswerValue> {
        Some(AnswerValue::Text(item.id.as_str().to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrittenResponse;

impl AnswerFormat for WrittenResponse {
    type Content = WrittenResponseContent;
    type Item = WrittenPrompt;

    const ACTIVITY_TYPE: ActivityType = ActivityType::WrittenResponse;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.prompts
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn is_complete(_answer: &AnswerValue, _item: &Self::Item) -> bool {
        true
    }

    fn reference_answer(_content: &Self::Content, item: &Self::Item) -> Option<AnswerValue> {
        item.sample_answer.clone().map(AnswerValue::Text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpokenResponse;

impl AnswerFormat for SpokenResponse {
    type Content = SpokenResponseContent;
    type Item = SpokenPrompt;

    const ACTIVITY_TYPE: ActivityType = ActivityType::SpokenResponse;

    fn items(content: &Self::Content) -> &[Self::Item] {
        &content.prompts
    }

    fn item_id(item: &Self::Item) -> &ItemId {
        &item.id
    }

    fn item_audio(item: &Self::Item) -> Option<&AudioSource> {
        item.model_audio.as_ref()
    }

    fn is_complete(_answer: &AnswerValue, _item: &Self::Item) -> bool {
        true
    }
}
