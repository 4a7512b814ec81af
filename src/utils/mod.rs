//! 공용 유틸리티
//!
//! - [`document`] - BSON 문서를 JSON 응답으로 바꾸는 변환기, ObjectId 파싱
//! - [`string_utils`] - 입력 문자열 정리

pub mod document;
pub mod string_utils;
