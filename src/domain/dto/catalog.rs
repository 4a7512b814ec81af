//! 카탈로그(회사, 학교, 강좌, 시험, 문항, 답안) 요청 DTO
//!
//! 각 페이로드는 [`CatalogPayload`]를 구현하여 저장될 컬렉션과 부모 참조를 알려줍니다.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;
use crate::core::registry::EntityKind;

/// 카탈로그 생성/수정 요청의 공통 인터페이스
pub trait CatalogPayload: Serialize + DeserializeOwned + Validate + Send + 'static {
    const KIND: EntityKind;

    /// 부모 문서 ID (부모가 있는 종류만)
    fn parent_id(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompanyPayload {
    #[validate(length(min = 1, max = 100, message = "회사명은 1-100자 사이여야 합니다"))]
    pub name: String,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(url(message = "유효한 URL을 입력해주세요"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CatalogPayload for CompanyPayload {
    const KIND: EntityKind = EntityKind::Company;
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SchoolPayload {
    #[validate(length(min = 1, max = 100, message = "학교명은 1-100자 사이여야 합니다"))]
    pub name: String,
    #[validate(length(max = 2000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(url(message = "유효한 URL을 입력해주세요"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl CatalogPayload for SchoolPayload {
    const KIND: EntityKind = EntityKind::School;
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CoursePayload {
    /// 소속 학교 ID
    pub school: String,
    #[validate(length(min = 1, max = 200, message = "강좌명은 1-200자 사이여야 합니다"))]
    pub title: String,
    #[validate(length(max = 5000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 520))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<u32>,
}

impl CatalogPayload for CoursePayload {
    const KIND: EntityKind = EntityKind::Course;

    fn parent_id(&self) -> Option<&str> {
        Some(&self.school)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TestPayload {
    /// 소속 강좌 ID
    pub course: String,
    #[validate(length(min = 1, max = 200, message = "시험명은 1-200자 사이여야 합니다"))]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(range(min = 1, max = 600))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u32>,
    #[validate(range(max = 100, message = "합격 점수는 0-100 사이여야 합니다"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<u32>,
}

impl CatalogPayload for TestPayload {
    const KIND: EntityKind = EntityKind::Test;

    fn parent_id(&self) -> Option<&str> {
        Some(&self.course)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionPayload {
    /// 소속 시험 ID
    pub test: String,
    #[validate(length(min = 1, max = 2000, message = "문항 내용은 1-2000자 사이여야 합니다"))]
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[validate(range(max = 1000))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

impl CatalogPayload for QuestionPayload {
    const KIND: EntityKind = EntityKind::Question;

    fn parent_id(&self) -> Option<&str> {
        Some(&self.test)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnswerPayload {
    /// 소속 문항 ID
    pub question: String,
    #[validate(length(min = 1, max = 2000, message = "답안 내용은 1-2000자 사이여야 합니다"))]
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl CatalogPayload for AnswerPayload {
    const KIND: EntityKind = EntityKind::Answer;

    fn parent_id(&self) -> Option<&str> {
        Some(&self.question)
    }
}

/// 목록 조회 필터 (`?parent=<id>`)
#[derive(Debug, Default, Deserialize)]
pub struct CatalogListQuery {
    pub parent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_reference_follows_kind() {
        let course = CoursePayload {
            school: "64b7f0c2a1b2c3d4e5f60718".to_string(),
            title: "Rust 101".to_string(),
            description: None,
            duration_weeks: Some(8),
        };

        assert_eq!(course.parent_id(), Some("64b7f0c2a1b2c3d4e5f60718"));
        assert_eq!(CoursePayload::KIND.parent().map(|(kind, _)| kind), Some(EntityKind::School));
        assert!(course.validate().is_ok());
    }

    #[test]
    fn test_passing_score_out_of_range() {
        let test = TestPayload {
            course: "64b7f0c2a1b2c3d4e5f60718".to_string(),
            title: "Final".to_string(),
            description: None,
            time_limit_minutes: None,
            passing_score: Some(150),
        };

        assert!(test.validate().is_err());
    }
}
