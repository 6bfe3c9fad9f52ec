use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable identifier of one answerable item
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One item's encoded answer
///
/// Every format encodes its answer as a single value: an option index for
/// multiple choice, a string for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AnswerValue {
    Index(usize),
    Text(String),
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            AnswerValue::Index(i) => Some(*i),
            AnswerValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnswerValue::Text(s) => Some(s),
            AnswerValue::Index(_) => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Index(i) => write!(f, "#{}", i),
            AnswerValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Answers keyed by item id
pub type AnswerMap = BTreeMap<ItemId, AnswerValue>;

/// Drop every entry whose key is not part of the given item set
///
/// Returns the number of removed entries.
pub fn retain_known<'a, I>(answers: &mut AnswerMap, item_ids: I) -> usize
where
    I: IntoIterator<Item = &'a ItemId>,
{
    let known: std::collections::BTreeSet<&ItemId> = item_ids.into_iter().collect();
    let before = answers.len();
    answers.retain(|id, _| known.contains(id));
    before - answers.len()
}
