//! User Entity Implementation
//!
//! 인증 주체(Principal)의 영속 레코드입니다.
//! 로컬 인증과 Google OAuth를 모두 지원하며, 프로필/CV 데이터와
//! 경력·학력 하위 문서에 대한 참조 목록을 함께 보관합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::AuthProvider;
use crate::domain::models::auth::authentication_request::Role;

/// 계정 상태
///
/// 사용자는 물리적으로 삭제되지 않고 상태만 바뀝니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Suspended,
    Deactivated,
}

/// OAuth 프로바이더에서 받은 부가 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthData {
    pub provider_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_profile_image: Option<String>,
}

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (unique)
    pub email: String,
    /// 사용자 이름 (unique)
    pub username: String,
    /// 표시 이름
    pub display_name: String,
    /// 해시된 비밀번호 (OAuth 사용자의 경우 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub auth_provider: AuthProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth_data: Option<OAuthData>,
    pub roles: Vec<Role>,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// 경력 하위 문서 ID 목록 (순서 유지)
    #[serde(default)]
    pub employments: Vec<ObjectId>,
    /// 학력 하위 문서 ID 목록 (순서 유지)
    #[serde(default)]
    pub educations: Vec<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stripe_customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/패스워드)
    ///
    /// 가입 직후 역할은 `talent` 하나입니다.
    pub fn new_local(email: String, username: String, display_name: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            username,
            display_name,
            password_hash: Some(password_hash),
            auth_provider: AuthProvider::Local,
            oauth_data: None,
            roles: vec![Role::Talent],
            status: UserStatus::Active,
            headline: None,
            bio: None,
            skills: Vec::new(),
            employments: Vec::new(),
            educations: Vec::new(),
            stripe_customer_id: None,
            profile_image_url: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 새 OAuth 사용자 생성
    pub fn new_oauth(
        email: String,
        username: String,
        display_name: String,
        auth_provider: AuthProvider,
        provider_user_id: String,
        provider_profile_image: Option<String>,
    ) -> Self {
        let mut user = Self::new_local(email, username, display_name, String::new());
        user.password_hash = None;
        user.auth_provider = auth_provider;
        user.oauth_data = Some(OAuthData {
            provider_user_id,
            provider_profile_image: provider_profile_image.clone(),
        });
        user.profile_image_url = provider_profile_image;
        user
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    pub fn can_authenticate_with_password(&self) -> bool {
        matches!(self.auth_provider, AuthProvider::Local) && self.password_hash.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn test_new_local_user_defaults() {
        let user = User::new_local(
            "kim@example.com".to_string(),
            "kim".to_string(),
            "Kim".to_string(),
            "hash".to_string(),
        );

        assert_eq!(user.roles, vec![Role::Talent]);
        assert!(user.is_active());
        assert!(user.can_authenticate_with_password());
        assert!(user.employments.is_empty());
    }

    #[test]
    fn test_oauth_user_cannot_use_password() {
        let user = User::new_oauth(
            "lee@gmail.com".to_string(),
            "lee".to_string(),
            "Lee".to_string(),
            AuthProvider::Google,
            "google-123".to_string(),
            None,
        );

        assert!(user.password_hash.is_none());
        assert!(!user.can_authenticate_with_password());
    }

    #[test]
    fn test_document_without_profile_lists_deserializes() {
        let now = DateTime::now();
        let doc = bson::doc! {
            "_id": ObjectId::new(),
            "email": "a@b.com",
            "username": "ab",
            "display_name": "AB",
            "auth_provider": "Local",
            "roles": ["talent", "hr_admin"],
            "status": "active",
            "created_at": now,
            "updated_at": now,
        };

        let user: User = bson::from_document(doc).unwrap();
        assert_eq!(user.roles, vec![Role::Talent, Role::HrAdmin]);
        assert!(user.skills.is_empty());
        assert!(user.educations.is_empty());
    }
}
