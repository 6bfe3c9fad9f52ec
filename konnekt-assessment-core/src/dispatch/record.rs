use crate::domain::ItemId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One generic question of a mixed-skill assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionRecord {
    pub question_id: ItemId,

    #[serde(default)]
    pub skill_slug: String,

    pub format_slug: String,

    /// Format-specific payload, opaque until reshaped
    #[serde(default)]
    pub question_data: Value,
}

impl QuestionRecord {
    pub fn new(
        question_id: impl Into<ItemId>,
        skill_slug: impl Into<String>,
        format_slug: impl Into<String>,
        question_data: Value,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            skill_slug: skill_slug.into(),
            format_slug: format_slug.into(),
            question_data,
        }
    }

    /// First non-blank string among the given payload fields
    pub fn text(&self, fields: &[&str]) -> Option<&str> {
        fields
            .iter()
            .filter_map(|field| self.question_data.get(*field).and_then(Value::as_str))
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    /// First non-empty string list among the given payload fields
    ///
    /// Non-string entries are skipped.
    pub fn strings(&self, fields: &[&str]) -> Vec<String> {
        fields
            .iter()
            .filter_map(|field| self.question_data.get(*field).and_then(Value::as_array))
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .find(|list| !list.is_empty())
            .unwrap_or_default()
    }

    /// First non-negative integer among the given payload fields
    pub fn number(&self, fields: &[&str]) -> Option<u64> {
        fields
            .iter()
            .filter_map(|field| self.question_data.get(*field))
            .find_map(Value::as_u64)
    }
}

/// Canonical form of a format or skill slug
pub fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase().replace(['-', ' '], "_")
}
