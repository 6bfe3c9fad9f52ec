use crate::audio::AudioSource;
use crate::domain::format::{
    AnswerFormat, FillBlank, Matching, MultipleChoice, SentenceBuilder, Spelling, SpokenResponse,
    WordBank, WrittenResponse,
};
use crate::domain::{AnswerValue, ItemId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for one spoken capture when the content does not set one
pub const DEFAULT_MAX_CAPTURE_SECS: u32 = 60;

/// Format tag of an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    MultipleChoice,
    FillBlank,
    WordBank,
    SentenceBuilder,
    Spelling,
    Matching,
    WrittenResponse,
    SpokenResponse,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::MultipleChoice => "multiple_choice",
            ActivityType::FillBlank => "fill_blank",
            ActivityType::WordBank => "word_bank",
            ActivityType::SentenceBuilder => "sentence_builder",
            ActivityType::Spelling => "spelling",
            ActivityType::Matching => "matching",
            ActivityType::WrittenResponse => "written_response",
            ActivityType::SpokenResponse => "spoken_response",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Multiple choice =====

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MultipleChoiceContent {
    pub questions: Vec<ChoiceQuestion>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChoiceQuestion {
    pub id: ItemId,
    pub prompt: String,
    pub options: Vec<String>,
    /// Reference answer, only shown when correct answers are revealed
    pub correct_index: Option<usize>,
    pub audio: Option<AudioSource>,
}

// ===== Free-text fill-blank =====

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FillBlankContent {
    pub items: Vec<BlankItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BlankItem {
    pub id: ItemId,
    /// Sentence with the gap marked as `___`
    pub sentence: String,
    pub answer: Option<String>,
    pub hint: Option<String>,
    pub audio: Option<AudioSource>,
}

// ===== Word-bank fill-blank =====

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WordBankContent {
    /// Shared bank, used by items without their own options
    pub word_bank: Vec<String>,
    pub items: Vec<WordBankItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WordBankItem {
    pub id: ItemId,
    pub sentence: String,
    pub options: Vec<String>,
    pub answer: Option<String>,
}

impl WordBankContent {
    /// Words offered for one item
    pub fn options_for<'a>(&'a self, item: &'a WordBankItem) -> &'a [String] {
        if item.options.is_empty() {
            &self.word_bank
        } else {
            &item.options
        }
    }
}

// ===== Ordered word assembly =====

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SentenceBuilderContent {
    pub items: Vec<SentenceItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SentenceItem {
    pub id: ItemId,
    pub prompt: String,
    /// Tiles offered to the learner
    pub words: Vec<String>,
    pub target_word_count: usize,
    /// Reference ordering
    pub answer: Vec<String>,
    pub audio: Option<AudioSource>,
}

impl SentenceItem {
    /// Number of words a complete answer holds
    pub fn target_len(&self) -> usize {
        if self.target_word_count > 0 {
            self.target_word_count
        } else if !self.answer.is_empty() {
            self.answer.len()
        } else {
            self.words.len()
        }
    }
}

// ===== Letter assembly =====

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SpellingContent {
    pub items: Vec<SpellingItem>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SpellingItem {
    pub id: ItemId,
    pub word: String,
    /// Letter tiles offered to the learner
    pub letters: Vec<char>,
    pub letter_count: usize,
    pub hint: Option<String>,
    pub audio: Option<AudioSource>,
}

impl SpellingItem {
    /// Number of letters a complete answer holds
    pub fn target_len(&self) -> usize {
        if self.letter_count > 0 {
            self.letter_count
        } else if !self.word.is_empty() {
            self.word.chars().count()
        } else {
            self.letters.len()
        }
    }
}

// ===== Matching =====

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingContent {
    pub pairs: Vec<MatchingPair>,
    /// Extra definitions that belong to no pair
    pub distractors: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MatchingPair {
    pub id: ItemId,
    pub word: String,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Definition {
    pub id: ItemId,
    pub text: String,
}

impl MatchingContent {
    /// Every selectable definition: one per pair (sharing the pair id), then distractors
    pub fn definitions(&self) -> Vec<Definition> {
        self.pairs
            .iter()
            .map(|pair| Definition {
                id: pair.id.clone(),
                text: pair.definition.clone(),
            })
            .chain(self.distractors.iter().cloned())
            .collect()
    }

    pub fn has_definition(&self, definition_id: &ItemId) -> bool {
        self.pairs.iter().any(|p| &p.id == definition_id)
            || self.distractors.iter().any(|d| &d.id == definition_id)
    }
}

// ===== Free responses =====

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WrittenResponseContent {
    pub prompts: Vec<WrittenPrompt>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WrittenPrompt {
    pub id: ItemId,
    pub prompt: String,
    pub min_words: Option<usize>,
    pub sample_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SpokenResponseContent {
    pub prompts: Vec<SpokenPrompt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SpokenPrompt {
    pub id: ItemId,
    pub prompt: String,
    pub max_duration_secs: u32,
    /// Model pronunciation, if any
    pub model_audio: Option<AudioSource>,
}

impl Default for SpokenPrompt {
    fn default() -> Self {
        Self {
            id: ItemId::default(),
            prompt: String::new(),
            max_duration_secs: DEFAULT_MAX_CAPTURE_SECS,
            model_audio: None,
        }
    }
}

/// Activity supplied by the host: a format tag plus its content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Activity {
    MultipleChoice(MultipleChoiceContent),
    FillBlank(FillBlankContent),
    WordBank(WordBankContent),
    SentenceBuilder(SentenceBuilderContent),
    Spelling(SpellingContent),
    Matching(MatchingContent),
    WrittenResponse(WrittenResponseContent),
    SpokenResponse(SpokenResponseContent),
}

impl Activity {
    pub fn activity_type(&self) -> ActivityType {
        match self {
            Activity::MultipleChoice(_) => ActivityType::MultipleChoice,
            Activity::FillBlank(_) => ActivityType::FillBlank,
            Activity::WordBank(_) => ActivityType::WordBank,
            Activity::SentenceBuilder(_) => ActivityType::SentenceBuilder,
            Activity::Spelling(_) => ActivityType::Spelling,
            Activity::Matching(_) => ActivityType::Matching,
            Activity::WrittenResponse(_) => ActivityType::WrittenResponse,
            Activity::SpokenResponse(_) => ActivityType::SpokenResponse,
        }
    }

    /// Item ids in declared order
    pub fn item_ids(&self) -> Vec<ItemId> {
        match self {
            Activity::MultipleChoice(c) => MultipleChoice::item_ids(c),
            Activity::FillBlank(c) => FillBlank::item_ids(c),
            Activity::WordBank(c) => WordBank::item_ids(c),
            Activity::SentenceBuilder(c) => SentenceBuilder::item_ids(c),
            Activity::Spelling(c) => Spelling::item_ids(c),
            Activity::Matching(c) => Matching::item_ids(c),
            Activity::WrittenResponse(c) => WrittenResponse::item_ids(c),
            Activity::SpokenResponse(c) => SpokenResponse::item_ids(c),
        }
    }

    /// Apply this activity's completeness predicate to one stored answer
    ///
    /// Unknown item ids are never complete.
    pub fn is_item_complete(&self, item_id: &ItemId, answer: &AnswerValue) -> bool {
        fn check<F: AnswerFormat>(content: &F::Content, id: &ItemId, answer: &AnswerValue) -> bool {
            F::items(content)
                .iter()
                .find(|item| F::item_id(item) == id)
                .map(|item| F::is_complete(answer, item))
                .unwrap_or(false)
        }

        match self {
            Activity::MultipleChoice(c) => check::<MultipleChoice>(c, item_id, answer),
            Activity::FillBlank(c) => check::<FillBlank>(c, item_id, answer),
            Activity::WordBank(c) => check::<WordBank>(c, item_id, answer),
            Activity::SentenceBuilder(c) => check::<SentenceBuilder>(c, item_id, answer),
            Activity::Spelling(c) => check::<Spelling>(c, item_id, answer),
            Activity::Matching(c) => check::<Matching>(c, item_id, answer),
            Activity::WrittenResponse(c) => check::<WrittenResponse>(c, item_id, answer),
            Activity::SpokenResponse(c) => check::<SpokenResponse>(c, item_id, answer),
        }
    }

    /// Audio attached to any item, in item order
    pub fn audio_sources(&self) -> Vec<&AudioSource> {
        match self {
            Activity::MultipleChoice(c) => c.questions.iter().filter_map(|q| q.audio.as_ref()).collect(),
            Activity::FillBlank(c) => c.items.iter().filter_map(|i| i.audio.as_ref()).collect(),
            Activity::SentenceBuilder(c) => c.items.iter().filter_map(|i| i.audio.as_ref()).collect(),
            Activity::Spelling(c) => c.items.iter().filter_map(|i| i.audio.as_ref()).collect(),
            Activity::SpokenResponse(c) => c
                .prompts
                .iter()
                .filter_map(|p| p.model_audio.as_ref())
                .collect(),
            Activity::WordBank(_) | Activity::Matching(_) | Activity::WrittenResponse(_) => Vec::new(),
        }
    }
}
