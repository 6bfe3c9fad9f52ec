pub mod activity;
pub mod answer;
pub mod encoding;
pub mod format;
pub mod navigation;
pub mod timestamp;

pub use activity::{
    Activity, ActivityType, BlankItem, ChoiceQuestion, Definition, FillBlankContent,
    MatchingContent, MatchingPair, MultipleChoiceContent, SentenceBuilderContent, SentenceItem,
    SpellingContent, SpellingItem, SpokenPrompt, SpokenResponseContent, WordBankContent,
    WordBankItem, WrittenPrompt, WrittenResponseContent, DEFAULT_MAX_CAPTURE_SECS,
};
pub use answer::{AnswerMap, AnswerValue, ItemId};
pub use format::AnswerFormat;
pub use navigation::{NavigationKey, NavigationState};
pub use timestamp::Timestamp;
