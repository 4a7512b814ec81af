//! 사용자/인증 응답 DTO

use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::config::AuthProvider;
use crate::domain::entities::users::user::{User, UserStatus};
use crate::domain::models::auth::authentication_request::Role;
use crate::domain::models::token::TokenPair;
use crate::utils::document::format_datetime;

/// 외부에 노출되는 사용자 표현 (비밀번호 해시 제외)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub auth_provider: AuthProvider,
    pub is_oauth_user: bool,
    pub roles: Vec<Role>,
    pub status: UserStatus,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub employments: Vec<String>,
    pub educations: Vec<String>,
    pub profile_image_url: Option<String>,
    pub last_login_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            username,
            display_name,
            auth_provider,
            roles,
            status,
            headline,
            bio,
            skills,
            employments,
            educations,
            profile_image_url,
            last_login_at,
            created_at,
            updated_at,
            ..
        } = user;

        let is_oauth_user = !matches!(auth_provider, AuthProvider::Local);

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            email,
            username,
            display_name,
            auth_provider,
            is_oauth_user,
            roles,
            status,
            headline,
            bio,
            skills,
            employments: employments.iter().map(|id| id.to_hex()).collect(),
            educations: educations.iter().map(|id| id.to_hex()).collect(),
            profile_image_url,
            last_login_at: last_login_at.map(format_datetime),
            created_at: format_datetime(created_at),
            updated_at: format_datetime(updated_at),
        }
    }
}

/// 로그인/가입/리프레시 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

impl AuthResponse {
    pub fn new(user: User, tokens: TokenPair) -> Self {
        Self { user: UserResponse::from(user), tokens }
    }
}

/// `GET /api/v1/me` 응답: 경력/학력 하위 문서를 펼쳐서 돌려줍니다.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub employments: Vec<Value>,
    pub educations: Vec<Value>,
}
