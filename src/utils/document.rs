//! BSON ↔ JSON 변환 유틸리티
//!
//! 저장소는 `bson::Document`를 다루고 HTTP 응답은 JSON을 다룹니다.
//! 응답에서는 `_id`를 `id`로, `ObjectId`를 hex 문자열로, 날짜를 RFC 3339 문자열로 바꿉니다.

use mongodb::bson::{oid::ObjectId, Bson, DateTime, Document};
use serde_json::{Map, Value};
use crate::core::errors::{AppError, AppResult};

/// RFC 3339 문자열로 변환 (범위를 벗어난 값은 밀리초 숫자 그대로)
pub fn format_datetime(value: DateTime) -> String {
    value
        .try_to_rfc3339_string()
        .unwrap_or_else(|_| value.timestamp_millis().to_string())
}

/// ID 문자열을 `ObjectId`로 파싱합니다. 형식이 잘못되면 `ValidationError`.
pub fn parse_object_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError(format!("유효하지 않은 ID 형식입니다: {}", id)))
}

/// 응답용 JSON 객체로 변환
pub fn document_to_json(doc: Document) -> Value {
    let mut map = Map::with_capacity(doc.len());

    for (key, value) in doc {
        let key = if key == "_id" { "id".to_string() } else { key };
        map.insert(key, bson_to_json(value));
    }

    Value::Object(map)
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(format_datetime(dt)),
        Bson::Document(doc) => document_to_json(doc),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// 요청 JSON 객체를 저장용 문서로 변환
pub fn json_to_document(fields: Map<String, Value>) -> AppResult<Document> {
    mongodb::bson::to_document(&fields).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_document_to_json_renames_id_and_flattens_types() {
        let id = ObjectId::new();
        let owner = ObjectId::new();
        let doc = doc! {
            "_id": id,
            "user": owner,
            "title": "Engineer",
            "tags": [owner],
            "years": 3,
        };

        let json = document_to_json(doc);
        assert_eq!(json["id"], id.to_hex());
        assert_eq!(json["user"], owner.to_hex());
        assert_eq!(json["tags"][0], owner.to_hex());
        assert_eq!(json["years"], 3);
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id("64b7f0c2a1b2c3d4e5f60718").is_ok());
        assert!(matches!(parse_object_id("nope"), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_format_datetime_is_rfc3339() {
        let formatted = format_datetime(DateTime::from_millis(0));
        assert!(formatted.starts_with("1970-01-01T00:00:00"));
    }
}
