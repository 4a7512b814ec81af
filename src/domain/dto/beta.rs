use serde::Deserialize;
use validator::Validate;

/// 베타 신청 요청
#[derive(Debug, Deserialize, Validate)]
pub struct BetaSignupRequest {
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(max = 100, message = "이름은 100자 이하여야 합니다"))]
    pub name: Option<String>,
}
