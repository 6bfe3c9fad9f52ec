//! Pure reshaping of generic question records into single-item activities
//!
//! Every reshaper keys its only item by the record's question id, so the
//! renderer's answer map lines up with the assessment's.

use crate::audio::resolve_audio;
use crate::config::AssessmentConfig;
use crate::dispatch::record::{normalize_slug, QuestionRecord};
use crate::domain::{
    Activity, BlankItem, ChoiceQuestion, Definition, FillBlankContent,
    MatchingContent, MatchingPair, MultipleChoiceContent, SentenceBuilderContent, SentenceItem,
    SpellingContent, SpellingItem, SpokenPrompt, SpokenResponseContent, WordBankContent,
    WordBankItem, WrittenPrompt, WrittenResponseContent,
};
use serde_json::Value;

/// Builds an activity from a record
pub type Reshaper = fn(&QuestionRecord, &AssessmentConfig) -> Activity;

const PROMPT_FIELDS: &[&str] = &["question", "prompt", "instruction", "text"];
const SENTENCE_FIELDS: &[&str] = &["sentence", "text", "question", "prompt"];
const ANSWER_FIELDS: &[&str] = &["answer", "correct_answer"];

fn is_listening(record: &QuestionRecord) -> bool {
    normalize_slug(&record.skill_slug) == "listening"
}

fn owned(text: Option<&str>) -> String {
    text.map(str::to_string).unwrap_or_default()
}

pub fn multiple_choice(record: &QuestionRecord, config: &AssessmentConfig) -> Activity {
    let options = record.strings(&["options", "choices"]);

    let correct_index = record
        .number(&["correct_index", "answer"])
        .map(|i| i as usize)
        .or_else(|| {
            let answer = record.text(ANSWER_FIELDS)?;
            options.iter().position(|option| option == answer)
        });

    let audio = is_listening(record).then(|| resolve_audio(&record.question_data, config));

    Activity::MultipleChoice(MultipleChoiceContent {
        questions: vec![ChoiceQuestion {
            id: record.question_id.clone(),
            prompt: owned(record.text(PROMPT_FIELDS)),
            options,
            correct_index,
            audio,
        }],
    })
}

fn blank_item(record: &QuestionRecord) -> BlankItem {
    BlankItem {
        id: record.question_id.clone(),
        sentence: owned(record.text(SENTENCE_FIELDS)),
        answer: record.text(ANSWER_FIELDS).map(str::to_string),
        hint: record.text(&["hint"]).map(str::to_string),
        audio: None,
    }
}

/// Free-text blank (writing and default skills)
pub fn fill_blank(record: &QuestionRecord, _config: &AssessmentConfig) -> Activity {
    Activity::FillBlank(FillBlankContent {
        items: vec![blank_item(record)],
    })
}

/// Free-text blank with dictation audio
pub fn fill_blank_listening(record: &QuestionRecord, config: &AssessmentConfig) -> Activity {
    let mut item = blank_item(record);
    item.audio = Some(resolve_audio(&record.question_data, config));

    Activity::FillBlank(FillBlankContent { items: vec![item] })
}

/// Blank filled from a word bank
pub fn word_bank(record: &QuestionRecord, _config: &AssessmentConfig) -> Activity {
    Activity::WordBank(WordBankContent {
        word_bank: record.strings(&["options", "word_bank", "choices"]),
        items: vec![WordBankItem {
            id: record.question_id.clone(),
            sentence: owned(record.text(SENTENCE_FIELDS)),
            options: Vec::new(),
            answer: record.text(ANSWER_FIELDS).map(str::to_string),
        }],
    })
}

fn split_words(text: Option<&str>) -> Vec<String> {
    text.map(|t| t.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn sorted_case_insensitive(mut words: Vec<String>) -> Vec<String> {
    words.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
    words
}

pub fn sentence_builder(record: &QuestionRecord, config: &AssessmentConfig) -> Activity {
    let mut answer = record.strings(&["answer", "correct_order"]);
    if answer.is_empty() {
        answer = split_words(record.text(&["sentence", "answer"]));
    }

    let mut words = record.strings(&["words", "tokens", "options"]);
    if words.is_empty() {
        // Tiles derived from the sentence itself must not reveal its order
        words = sorted_case_insensitive(answer.clone());
    }

    let target_word_count = record
        .number(&["target_word_count", "word_count"])
        .map(|n| n as usize)
        .unwrap_or(if answer.is_empty() { words.len() } else { answer.len() });

    let audio = is_listening(record).then(|| resolve_audio(&record.question_data, config));

    Activity::SentenceBuilder(SentenceBuilderContent {
        items: vec![SentenceItem {
            id: record.question_id.clone(),
            prompt: owned(record.text(&["prompt", "instruction", "question", "translation"])),
            words,
            target_word_count,
            answer,
            audio,
        }],
    })
}

pub fn spelling(record: &QuestionRecord, config: &AssessmentConfig) -> Activity {
    let word = owned(record.text(&["word", "answer"]));

    let mut letters: Vec<char> = record
        .strings(&["letters"])
        .iter()
        .filter_map(|letter| letter.chars().next())
        .collect();
    if letters.is_empty() {
        letters = word.chars().collect();
        letters.sort_unstable();
    }

    let letter_count = record
        .number(&["letter_count"])
        .map(|n| n as usize)
        .unwrap_or_else(|| word.chars().count());

    Activity::Spelling(SpellingContent {
        items: vec![SpellingItem {
            id: record.question_id.clone(),
            word,
            letters,
            letter_count,
            hint: record.text(&["hint", "definition", "translation"]).map(str::to_string),
            audio: Some(resolve_audio(&record.question_data, config)),
        }],
    })
}

fn distractors(record: &QuestionRecord) -> Vec<Definition> {
    let Some(values) = record
        .question_data
        .get("distractors")
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let fallback_id = format!("{}:distractor:{}", record.question_id, i);
            match value {
                Value::String(text) => Some(Definition {
                    id: fallback_id.into(),
                    text: text.clone(),
                }),
                Value::Object(fields) => {
                    let text = fields.get("text").and_then(Value::as_str)?;
                    let id = fields
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or(fallback_id);
                    Some(Definition {
                        id: id.into(),
                        text: text.to_string(),
                    })
                }
                _ => None,
            }
        })
        .collect()
}

/// One pair keyed by the question id, plus distractor definitions
pub fn matching(record: &QuestionRecord, _config: &AssessmentConfig) -> Activity {
    Activity::Matching(MatchingContent {
        pairs: vec![MatchingPair {
            id: record.question_id.clone(),
            word: owned(record.text(&["word", "term", "prompt"])),
            definition: owned(record.text(&["definition", "meaning", "answer"])),
        }],
        distractors: distractors(record),
    })
}

pub fn spoken_response(record: &QuestionRecord, config: &AssessmentConfig) -> Activity {
    let max_duration_secs = record
        .number(&["max_duration_secs", "max_duration"])
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(config.default_max_capture_secs);

    Activity::SpokenResponse(SpokenResponseContent {
        prompts: vec![SpokenPrompt {
            id: record.question_id.clone(),
            prompt: owned(record.text(&["prompt", "question", "sentence", "text"])),
            max_duration_secs,
            model_audio: Some(resolve_audio(&record.question_data, config)),
        }],
    })
}

pub fn written_response(record: &QuestionRecord, _config: &AssessmentConfig) -> Activity {
    Activity::WrittenResponse(WrittenResponseContent {
        prompts: vec![WrittenPrompt {
            id: record.question_id.clone(),
            prompt: owned(record.text(PROMPT_FIELDS)),
            min_words: record.number(&["min_words"]).map(|n| n as usize),
            sample_answer: record
                .text(&["sample_answer", "answer"])
                .map(str::to_string),
        }],
    })
}
