//! 비밀번호 해싱과 다이제스트
//!
//! 엔티티 저장 훅 대신 사용자 생성/수정 흐름에서 명시적으로 호출하는 순수 함수입니다.

use base64::{Engine as _, engine::general_purpose};
use sha2::{Digest, Sha256};
use crate::core::errors::{AppError, AppResult};

/// bcrypt 해시 생성
pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))
}

/// 평문 비밀번호와 bcrypt 해시 비교
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))
}

/// 저장된 비밀번호 해시의 SHA-256 다이제스트 (base64url, 패딩 없음)
///
/// 리프레시 토큰 서명 키의 일부로 쓰이므로 비밀번호가 바뀌면 값도 바뀝니다.
/// 비밀번호가 없는 OAuth 사용자는 빈 문자열의 다이제스트를 씁니다.
pub fn password_digest(password_hash: Option<&str>) -> String {
    let hash = Sha256::digest(password_hash.unwrap_or_default().as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Password123", 4).unwrap();

        assert_ne!(hash, "Password123");
        assert!(verify_password("Password123", &hash).unwrap());
        assert!(!verify_password("Password124", &hash).unwrap());
    }

    #[test]
    fn test_digest_changes_with_hash() {
        let first = password_digest(Some("$2b$04$aaaa"));
        let second = password_digest(Some("$2b$04$bbbb"));

        assert_ne!(first, second);
        assert_eq!(first, password_digest(Some("$2b$04$aaaa")));
        assert!(!first.contains('='));
        assert_eq!(password_digest(None), password_digest(Some("")));
    }
}
