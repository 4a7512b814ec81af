//! 문자열 입력 정리 유틸리티

use serde_json::Value;

/// 앞뒤 공백을 제거하고, 비어 있으면 `None`으로 바꿉니다.
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 스킬 목록 정규화: 공백 제거, 빈 값 제거, 대소문자 무시 중복 제거 (첫 등장 순서 유지)
pub fn normalize_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();

    skills
        .into_iter()
        .filter_map(|s| clean_optional_string(Some(s)))
        .filter(|s| seen.insert(s.to_lowercase()))
        .collect()
}

/// JSON 값이 "채워진" 필드인지 확인 (null, 공백 문자열은 비어 있음)
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  World  ".to_string())), Some("World".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_normalize_skills() {
        let skills = vec![
            " Rust ".to_string(),
            "rust".to_string(),
            "".to_string(),
            "MongoDB".to_string(),
        ];

        assert_eq!(normalize_skills(skills), vec!["Rust".to_string(), "MongoDB".to_string()]);
    }

    #[test]
    fn test_is_present() {
        assert!(is_present(Some(&json!("Acme"))));
        assert!(is_present(Some(&json!(0))));
        assert!(!is_present(Some(&json!("  "))));
        assert!(!is_present(Some(&Value::Null)));
        assert!(!is_present(None));
    }
}
