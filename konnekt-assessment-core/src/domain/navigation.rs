use crate::domain::format::AnswerFormat;
use crate::domain::{AnswerMap, ItemId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Position and per-item completion, published to the host for progress display
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    pub current_index: usize,
    pub total_items: usize,
    /// Answered item ids in item order
    pub answered_item_ids: Vec<ItemId>,
    pub answered_indices: Vec<usize>,
}

/// Comparison key deciding whether a new state is worth publishing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationKey {
    current_index: usize,
    total_items: usize,
    sorted_answered_ids: Vec<ItemId>,
}

impl NavigationState {
    /// Derive the state from an item set and its answers
    ///
    /// `is_answered` is called once per item, in item order.
    pub fn derive<F>(item_ids: &[ItemId], current_index: usize, mut is_answered: F) -> Self
    where
        F: FnMut(usize, &ItemId) -> bool,
    {
        let mut answered_item_ids = Vec::new();
        let mut answered_indices = Vec::new();

        for (index, id) in item_ids.iter().enumerate() {
            if is_answered(index, id) {
                answered_item_ids.push(id.clone());
                answered_indices.push(index);
            }
        }

        Self {
            current_index: clamp_index(current_index, item_ids.len()),
            total_items: item_ids.len(),
            answered_item_ids,
            answered_indices,
        }
    }

    /// Derive the state for one format's content
    pub fn for_format<A: AnswerFormat>(
        content: &A::Content,
        answers: &AnswerMap,
        current_index: usize,
    ) -> Self {
        let items = A::items(content);
        let ids = A::item_ids(content);

        Self::derive(&ids, current_index, |index, id| {
            answers
                .get(id)
                .map(|answer| A::is_complete(answer, &items[index]))
                .unwrap_or(false)
        })
    }

    pub fn key(&self) -> NavigationKey {
        let mut sorted_answered_ids = self.answered_item_ids.clone();
        sorted_answered_ids.sort();

        NavigationKey {
            current_index: self.current_index,
            total_items: self.total_items,
            sorted_answered_ids,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answered_indices.len()
    }

    pub fn is_answered(&self, index: usize) -> bool {
        self.answered_indices.binary_search(&index).is_ok()
    }

    pub fn is_complete(&self) -> bool {
        self.total_items > 0 && self.answered_count() == self.total_items
    }
}

/// Clamp an index into `[0, len - 1]`, or 0 for an empty set
pub fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        index.min(len - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|s| ItemId::from(*s)).collect()
    }

    #[test]
    fn test_derive_scans_in_item_order() {
        let items = ids(&["c", "a", "b"]);
        let state = NavigationState::derive(&items, 1, |_, id| id.as_str() != "a");

        assert_eq!(state.total_items, 3);
        assert_eq!(state.answered_indices, vec![0, 2]);
        assert_eq!(state.answered_item_ids, ids(&["c", "b"]));
    }

    #[test]
    fn test_current_index_clamped() {
        let state = NavigationState::derive(&ids(&["a", "b"]), 9, |_, _| false);
        assert_eq!(state.current_index, 1);

        let empty = NavigationState::derive(&[], 4, |_, _| true);
        assert_eq!(empty.current_index, 0);
        assert_eq!(empty.total_items, 0);
        assert!(!empty.is_complete());
    }

    #[test]
    fn test_key_ignores_answer_listing_order() {
        let a = NavigationState {
            current_index: 0,
            total_items: 2,
            answered_item_ids: ids(&["x", "y"]),
            answered_indices: vec![0, 1],
        };
        let b = NavigationState {
            answered_item_ids: ids(&["y", "x"]),
            ..a.clone()
        };

        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_camel_case_wire_shape() {
        let state = NavigationState::derive(&ids(&["q1"]), 0, |_, _| true);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["currentIndex"], 0);
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["answeredItemIds"][0], "q1");
        assert_eq!(json["answeredIndices"][0], 0);
    }
}
