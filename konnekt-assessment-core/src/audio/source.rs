use crate::config::AssessmentConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields that may carry a pre-hosted audio URL
const READY_URL_FIELDS: &[&str] = &["audio_url", "audioUrl", "audio"];

/// Preferred text fields for synthesis, best first
const CANONICAL_TEXT_FIELDS: &[&str] = &["sentence", "word", "text", "transcript"];

/// Text fields used only when no canonical field has text
const PARAPHRASE_TEXT_FIELDS: &[&str] = &["paraphrase"];

/// Where a spoken asset comes from
///
/// Ready and synthesized sources are interchangeable for playback; a pending
/// source renders a disabled affordance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AudioSource {
    Ready { url: String },
    Synthesized { url: String, text: String },
    Pending,
}

impl AudioSource {
    pub fn url(&self) -> Option<&str> {
        match self {
            AudioSource::Ready { url } | AudioSource::Synthesized { url, .. } => Some(url),
            AudioSource::Pending => None,
        }
    }

    pub fn is_playable(&self) -> bool {
        self.url().is_some()
    }
}

/// Build an on-demand synthesis source for literal text
///
/// Blank text or an unusable endpoint yields [`AudioSource::Pending`].
pub fn synthesis_source(text: &str, config: &AssessmentConfig) -> AudioSource {
    let text = text.trim();
    if text.is_empty() {
        return AudioSource::Pending;
    }

    match url::Url::parse_with_params(
        &config.synthesis_endpoint,
        &[("text", text), ("lang", config.synthesis_language.as_str())],
    ) {
        Ok(url) => AudioSource::Synthesized {
            url: url.to_string(),
            text: text.to_string(),
        },
        Err(e) => {
            tracing::warn!(
                "Synthesis endpoint {:?} unusable ({}), audio stays pending",
                config.synthesis_endpoint,
                e
            );
            AudioSource::Pending
        }
    }
}

/// Pick the audio source for a raw question payload
///
/// A ready URL wins; otherwise synthesis from the best text field; otherwise
/// pending.
pub fn resolve_audio(data: &Value, config: &AssessmentConfig) -> AudioSource {
    if let Some(url) = first_text(data, READY_URL_FIELDS) {
        return AudioSource::Ready {
            url: url.to_string(),
        };
    }

    let text =
        first_text(data, CANONICAL_TEXT_FIELDS).or_else(|| first_text(data, PARAPHRASE_TEXT_FIELDS));

    match text {
        Some(text) => synthesis_source(text, config),
        None => {
            tracing::warn!("No audio URL or text in payload, audio stays pending");
            AudioSource::Pending
        }
    }
}

fn first_text<'a>(data: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields
        .iter()
        .filter_map(|field| data.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> AssessmentConfig {
        AssessmentConfig::new("https://tts.example.org/speak".to_string())
    }

    #[test]
    fn test_ready_url_wins() {
        let data = json!({ "audio_url": "https://cdn.example.org/a.mp3", "sentence": "Hallo" });
        assert_eq!(
            resolve_audio(&data, &config()),
            AudioSource::Ready {
                url: "https://cdn.example.org/a.mp3".to_string()
            }
        );
    }

    #[test]
    fn test_blank_url_falls_back_to_synthesis() {
        let data = json!({ "audio_url": "  ", "sentence": "Guten Morgen" });

        match resolve_audio(&data, &config()) {
            AudioSource::Synthesized { url, text } => {
                assert_eq!(text, "Guten Morgen");
                assert!(url.starts_with("https://tts.example.org/speak?"));
                assert!(url.contains("text=Guten+Morgen"));
                assert!(url.contains("lang=de-DE"));
            }
            other => panic!("Expected synthesized source, got {:?}", other),
        }
    }

    #[test]
    fn test_canonical_text_preferred_over_paraphrase() {
        let data = json!({ "paraphrase": "Sinngemäß", "word": "Baum" });

        match resolve_audio(&data, &config()) {
            AudioSource::Synthesized { text, .. } => assert_eq!(text, "Baum"),
            other => panic!("Expected synthesized source, got {:?}", other),
        }
    }

    #[test]
    fn test_paraphrase_used_as_last_resort() {
        let data = json!({ "paraphrase": "Er geht nach Hause" });

        match resolve_audio(&data, &config()) {
            AudioSource::Synthesized { text, .. } => assert_eq!(text, "Er geht nach Hause"),
            other => panic!("Expected synthesized source, got {:?}", other),
        }
    }

    #[test]
    fn test_no_text_is_pending() {
        let data = json!({ "options": ["a", "b"] });
        let source = resolve_audio(&data, &config());

        assert_eq!(source, AudioSource::Pending);
        assert!(!source.is_playable());
    }

    #[test]
    fn test_bad_endpoint_is_pending() {
        let config = AssessmentConfig::new("::nope::".to_string());
        assert_eq!(synthesis_source("Hallo", &config), AudioSource::Pending);
    }
}
