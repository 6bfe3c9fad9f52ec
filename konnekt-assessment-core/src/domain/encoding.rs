//! Answer encoding conventions
//!
//! Pure helpers that turn a format's answer into its single stored value and
//! decide whether a stored value counts as "answered". Renderers never test
//! completeness any other way.

use crate::domain::{AnswerValue, ItemId};

/// Stored for written and spoken responses once the learner submitted them
pub const SUBMITTED_SENTINEL: &str = "__submitted__";

/// Free-text fill-blank: only non-blank text counts
pub fn is_filled_text(answer: &AnswerValue) -> bool {
    answer
        .as_text()
        .map(|text| !text.trim().is_empty())
        .unwrap_or(false)
}

/// Serialize an ordered word sequence
pub fn encode_word_sequence(words: &[String]) -> String {
    serde_json::to_string(words).unwrap_or_else(|_| "[]".to_string())
}

/// Parse an ordered word sequence; malformed input decodes to an empty list
pub fn decode_word_sequence(encoded: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(encoded) {
        Ok(words) => words,
        Err(e) => {
            tracing::debug!("Discarding malformed word sequence {:?}: {}", encoded, e);
            Vec::new()
        }
    }
}

/// Decode the word sequence stored in an answer value
pub fn word_sequence_of(answer: Option<&AnswerValue>) -> Vec<String> {
    answer
        .and_then(AnswerValue::as_text)
        .map(decode_word_sequence)
        .unwrap_or_default()
}

/// Ordered word assembly: complete once the sequence has the target length
pub fn is_word_sequence_complete(answer: &AnswerValue, target_word_count: usize) -> bool {
    let words = word_sequence_of(Some(answer));
    !words.is_empty() && words.len() == target_word_count
}

/// Concatenate placed letters in placement order
pub fn encode_letters(letters: &[char]) -> String {
    letters.iter().collect()
}

/// Split a stored spelling answer back into its placed letters
pub fn decode_letters(encoded: &str) -> Vec<char> {
    encoded.chars().collect()
}

/// Spelling: complete once every letter slot is filled
pub fn is_spelling_complete(answer: &AnswerValue, target_letter_count: usize) -> bool {
    match answer.as_text() {
        Some(letters) => {
            let placed = letters.chars().count();
            placed > 0 && placed == target_letter_count
        }
        None => false,
    }
}

/// Matching: a pair is correct when the chosen definition carries the pair's id
pub fn is_match_correct(pair_id: &ItemId, answer: &AnswerValue) -> bool {
    answer.as_text() == Some(pair_id.as_str())
}

/// Encode captured audio as a `data:` URL
pub fn encode_audio_data_url(mime_type: &str, bytes: &[u8]) -> String {
    use base64::Engine;

    format!(
        "data:{};base64,{}",
        mime_type,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Decode a `data:` URL produced by [`encode_audio_data_url`]
///
/// Returns the mime type and raw bytes, or `None` for anything else
/// (including the submitted sentinel).
pub fn decode_audio_data_url(encoded: &str) -> Option<(String, Vec<u8>)> {
    use base64::Engine;

    let rest = encoded.strip_prefix("data:")?;
    let (mime_type, payload) = rest.split_once(";base64,")?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;
    Some((mime_type.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_filled_text_ignores_whitespace() {
        assert!(is_filled_text(&AnswerValue::text("Katze")));
        assert!(is_filled_text(&AnswerValue::text("  x ")));
        assert!(!is_filled_text(&AnswerValue::text("   ")));
        assert!(!is_filled_text(&AnswerValue::text("")));
        assert!(!is_filled_text(&AnswerValue::Index(0)));
    }

    #[test]
    fn test_malformed_word_sequence_decodes_empty() {
        assert!(decode_word_sequence("not json").is_empty());
        assert!(decode_word_sequence("[1, 2]").is_empty());
        assert!(decode_word_sequence("{\"a\": 1}").is_empty());
    }

    #[test]
    fn test_word_sequence_completeness() {
        let words: Vec<String> = ["Ich", "bin", "sehr", "müde"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        let full = AnswerValue::Text(encode_word_sequence(&words));
        let partial = AnswerValue::Text(encode_word_sequence(&words[..3]));

        assert!(is_word_sequence_complete(&full, 4));
        assert!(!is_word_sequence_complete(&partial, 4));
        assert!(!is_word_sequence_complete(&AnswerValue::text("garbage"), 0));
    }

    #[test]
    fn test_spelling_counts_chars_not_bytes() {
        assert!(is_spelling_complete(&AnswerValue::text("grün"), 4));
        assert!(!is_spelling_complete(&AnswerValue::text("grü"), 4));
        assert!(!is_spelling_complete(&AnswerValue::text(""), 0));
    }

    #[test]
    fn test_match_correctness_compares_ids() {
        let pair = ItemId::from("p1");
        assert!(is_match_correct(&pair, &AnswerValue::text("p1")));
        assert!(!is_match_correct(&pair, &AnswerValue::text("p2")));
    }

    #[test]
    fn test_audio_data_url_roundtrip() {
        let encoded = encode_audio_data_url("audio/webm", &[1, 2, 3, 250]);
        assert!(encoded.starts_with("data:audio/webm;base64,"));

        let (mime, bytes) = decode_audio_data_url(&encoded).unwrap();
        assert_eq!(mime, "audio/webm");
        assert_eq!(bytes, vec![1, 2, 3, 250]);

        assert!(decode_audio_data_url(SUBMITTED_SENTINEL).is_none());
    }

    proptest! {
        #[test]
        fn prop_word_sequence_roundtrip(words in proptest::collection::vec(".*", 0..8)) {
            prop_assert_eq!(decode_word_sequence(&encode_word_sequence(&words)), words);
        }

        #[test]
        fn prop_letters_roundtrip(letters in proptest::collection::vec(any::<char>(), 0..16)) {
            prop_assert_eq!(decode_letters(&encode_letters(&letters)), letters);
        }
    }
}
