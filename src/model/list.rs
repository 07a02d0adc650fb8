// File: ./src/model/list.rs
use serde::{Deserialize, Serialize};

/// Lightweight record shown on the home screen. The backend computes
/// `item_count`; the client never adjusts it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListSummary {
    pub id: String,
    pub name: String,
    pub item_count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

/// A full list as returned by the backend. Every mutation answers with one of
/// these, and it replaces whatever the detail screen was showing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ToDoList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl ToDoList {
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn checked_count(&self) -> usize {
        self.items.iter().filter(|i| i.checked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_summary_array() {
        let json = r#"[
            {"id": "65f0c1", "name": "Chores", "item_count": 0},
            {"id": "65f0c2", "name": "Groceries", "item_count": 2}
        ]"#;
        let lists: Vec<ListSummary> = serde_json::from_str(json).unwrap();
        assert_eq!(lists.len(), 2);
        assert_eq!(lists[1].name, "Groceries");
        assert_eq!(lists[1].item_count, 2);
    }

    #[test]
    fn rejects_negative_item_count() {
        let json = r#"{"id": "x", "name": "Broken", "item_count": -1}"#;
        assert!(serde_json::from_str::<ListSummary>(json).is_err());
    }

    #[test]
    fn decodes_full_list_and_keeps_item_order() {
        let json = r#"{
            "id": "1",
            "name": "Groceries",
            "items": [
                {"id": "it-1", "label": "Milk", "checked": true},
                {"id": "it-9", "label": "Bread", "checked": false}
            ]
        }"#;
        let list: ToDoList = serde_json::from_str(json).unwrap();
        assert_eq!(list.items[0].id, "it-1");
        assert_eq!(list.items[1].label, "Bread");
        assert_eq!(list.checked_count(), 1);
        assert!(!list.is_empty());
    }
}
