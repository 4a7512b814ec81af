//! 하위 문서 재조정(create/update/delete) 요청 항목

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 재조정 요청 항목 하나
///
/// ```json
/// [
///   { "action": "create", "title": "Engineer", "company": "Acme" },
///   { "action": "update", "id": "64b7...", "title": "Senior Engineer" },
///   { "action": "delete", "id": "64b8..." }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReconcileItem {
    Create {
        #[serde(flatten)]
        fields: Map<String, Value>,
    },
    Update {
        #[serde(alias = "_id")]
        id: String,
        #[serde(flatten)]
        fields: Map<String, Value>,
    },
    Delete {
        #[serde(alias = "_id")]
        id: String,
    },
}

impl ReconcileItem {
    /// update/delete 항목이 참조하는 ID
    pub fn target_id(&self) -> Option<&str> {
        match self {
            ReconcileItem::Create { .. } => None,
            ReconcileItem::Update { id, .. } | ReconcileItem::Delete { id } => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_items_parse_by_action_tag() {
        let items: Vec<ReconcileItem> = serde_json::from_value(json!([
            { "action": "create", "title": "Engineer", "company": "Acme" },
            { "action": "update", "id": "a1", "title": "Lead" },
            { "action": "delete", "_id": "b2" },
        ]))
        .unwrap();

        match &items[0] {
            ReconcileItem::Create { fields } => {
                assert_eq!(fields["company"], "Acme");
                assert!(!fields.contains_key("action"));
            }
            other => panic!("unexpected item: {:?}", other),
        }
        assert_eq!(items[1].target_id(), Some("a1"));
        assert_eq!(items[2], ReconcileItem::Delete { id: "b2".to_string() });
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let result = serde_json::from_value::<ReconcileItem>(json!({ "action": "upsert", "id": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_update_without_id_is_rejected() {
        let result = serde_json::from_value::<ReconcileItem>(json!({ "action": "update", "title": "x" }));
        assert!(result.is_err());
    }
}
