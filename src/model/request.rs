// File: ./src/model/request.rs
// JSON bodies sent to (and the one small body received from) the list service
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewList {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewListResponse {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub label: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CheckedStateUpdate {
    pub item_id: String,
    pub checked_state: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn checked_state_update_uses_backend_field_names() {
        let body = CheckedStateUpdate {
            item_id: "it-9".to_string(),
            checked_state: true,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"item_id": "it-9", "checked_state": true})
        );
    }

    #[test]
    fn new_list_body_is_a_bare_name() {
        let body = NewList {
            name: "Chores".to_string(),
        };
        assert_eq!(serde_json::to_value(&body).unwrap(), json!({"name": "Chores"}));
    }
}
