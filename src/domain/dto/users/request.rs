//! 사용자/인증 요청 DTO

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::entities::users::user::UserStatus;
use crate::domain::models::auth::authentication_request::Role;
use crate::domain::models::reconcile::ReconcileItem;

/// 로컬 회원가입 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_passwords_match"))]
pub struct RegisterRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 3, max = 30, message = "사용자명은 3-30자 사이여야 합니다"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(min = 1, max = 50, message = "표시 이름은 1-50자 사이여야 합니다"))]
    pub display_name: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,

    pub password_confirm: String,
}

fn validate_passwords_match(req: &RegisterRequest) -> Result<(), ValidationError> {
    if req.password != req.password_confirm {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("비밀번호가 일치하지 않습니다".into()));
    }
    Ok(())
}

pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_username")
            .with_message("사용자명은 알파벳, 숫자, 언더스코어만 사용 가능합니다".into()));
    }
    Ok(())
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 대문자, 소문자, 숫자를 포함해야 합니다".into()));
    }
    Ok(())
}

/// 로컬 로그인 요청
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다"))]
    pub refresh_token: String,
}

/// 비밀번호 변경 요청
///
/// 변경에 성공하면 기존 리프레시 토큰은 모두 검증에 실패합니다.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "현재 비밀번호를 입력해주세요"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub new_password: String,
}

/// 프로필 수정 요청 (`PATCH /api/v1/me`)
///
/// 지정한 필드만 변경합니다. `employments`/`educations`는 재조정 항목 배열입니다.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditProfileRequest {
    #[validate(length(min = 1, max = 50, message = "표시 이름은 1-50자 사이여야 합니다"))]
    pub display_name: Option<String>,

    #[validate(length(max = 120, message = "헤드라인은 120자 이하여야 합니다"))]
    pub headline: Option<String>,

    #[validate(length(max = 2000, message = "자기소개는 2000자 이하여야 합니다"))]
    pub bio: Option<String>,

    #[validate(length(max = 50, message = "스킬은 최대 50개까지 등록할 수 있습니다"))]
    pub skills: Option<Vec<String>>,

    #[validate(url(message = "유효한 URL을 입력해주세요"))]
    pub profile_image_url: Option<String>,

    pub employments: Option<Vec<ReconcileItem>>,

    pub educations: Option<Vec<ReconcileItem>>,
}

/// 역할 재지정 요청 (슈퍼 관리자 전용)
#[derive(Debug, Deserialize, Validate)]
pub struct AssignRolesRequest {
    #[validate(length(min = 1, message = "최소 하나의 역할이 필요합니다"))]
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetStatusRequest {
    pub status: UserStatus,
}

/// 사용자 목록 필터
#[derive(Debug, Default, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

/// Google OAuth 콜백 쿼리
#[derive(Debug, Deserialize, Validate)]
pub struct OAuthCallbackQuery {
    /// 사용자가 동의를 거부하면 비어 있고 `error`가 채워집니다.
    #[serde(default)]
    #[validate(length(min = 1, message = "Authorization code가 필요합니다"))]
    pub code: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "State가 필요합니다"))]
    pub state: String,

    pub error: Option<String>,
    pub error_description: Option<String>,
}
