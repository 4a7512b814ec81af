//! # User Service
//!
//! 계정 수명주기(가입, 로그인, 토큰 갱신, 비밀번호 변경), 프로필 편집,
//! 관리자용 사용자 관리 기능을 제공합니다.
//!
//! 비밀번호 해싱과 토큰 발급은 저장 훅이 아니라 이 서비스의 흐름 안에서 명시적으로 호출됩니다.

use std::sync::Arc;
use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};
use serde_json::Value;
use crate::core::errors::{AppError, AppResult, AuthError};
use crate::core::registry::{EntityKind, Registry};
use crate::domain::dto::users::{
    AuthResponse, ChangePasswordRequest, EditProfileRequest, ListUsersQuery, LoginRequest,
    ProfileResponse, RegisterRequest, UserResponse,
};
use crate::domain::entities::users::user::{User, UserStatus};
use crate::domain::models::auth::{AuthContext, Role};
use crate::repositories::users::UserRepository;
use crate::services::auth::password::{hash_password, password_digest, verify_password};
use crate::services::auth::token_service::TokenService;
use crate::services::profile::SubDocumentReconciler;
use crate::utils::document::{document_to_json, parse_object_id};
use crate::utils::string_utils::{clean_optional_string, normalize_skills};

pub struct UserService {
    users: Arc<UserRepository>,
    tokens: Arc<TokenService>,
    registry: Registry,
    reconciler: SubDocumentReconciler,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<UserRepository>, tokens: Arc<TokenService>, registry: Registry, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            reconciler: SubDocumentReconciler::new(registry.clone()),
            registry,
            bcrypt_cost,
        }
    }

    fn issue(&self, user: User) -> AppResult<AuthResponse> {
        let tokens = self.tokens.issue_token_pair(&user)?;
        Ok(AuthResponse::new(user, tokens))
    }

    /// 로컬 회원가입. 가입 즉시 토큰 쌍을 발급합니다.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;

        let user = User::new_local(request.email, request.username, request.display_name, password_hash);
        let created = self.users.create(user).await?;

        log::info!("새 사용자 가입: {} ({})", created.username, created.id_string().unwrap_or_default());
        self.issue(created)
    }

    /// 이메일/비밀번호 로그인
    ///
    /// 사용자가 없을 때와 비밀번호가 틀릴 때 같은 메시지를 돌려줍니다.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let invalid = || AppError::AuthenticationError("잘못된 이메일 또는 비밀번호입니다".to_string());

        let user = self.users.find_by_email(&request.email).await?.ok_or_else(invalid)?;

        if !user.can_authenticate_with_password() {
            return Err(AppError::AuthenticationError(
                "OAuth 계정입니다. 해당 프로바이더로 로그인해주세요".to_string(),
            ));
        }

        let password_hash = user.password_hash.as_deref().unwrap_or_default();
        if !verify_password(&request.password, password_hash)? {
            return Err(invalid());
        }

        if !user.is_active() {
            return Err(AppError::AuthenticationError("비활성화된 계정입니다".to_string()));
        }

        let id = user.id.ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;
        let user = self.users
            .update(&id, doc! { "last_login_at": DateTime::now() })
            .await?
            .unwrap_or(user);

        self.issue(user)
    }

    /// 리프레시 토큰으로 새 토큰 쌍 발급
    ///
    /// 서명 키에 현재 비밀번호 다이제스트가 들어가므로, 먼저 서명 없이 사용자 ID를 읽어
    /// 사용자를 찾은 다음 그 사용자의 다이제스트로 검증합니다.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthResponse> {
        let subject = self.tokens.peek_refresh_subject(refresh_token)?;
        let user_id = ObjectId::parse_str(&subject).map_err(|_| AuthError::InvalidToken)?;

        let user = self.users
            .find_by_object_id(&user_id)
            .await?
            .filter(User::is_active)
            .ok_or(AuthError::UserNotFound)?;

        let digest = password_digest(user.password_hash.as_deref());
        let claims = self.tokens.verify_refresh_token(refresh_token, &digest)?;

        if claims.user_id != subject {
            return Err(AuthError::InvalidToken.into());
        }

        self.issue(user)
    }

    /// 비밀번호 변경. 기존 리프레시 토큰은 모두 무효가 되고 새 토큰 쌍을 돌려줍니다.
    pub async fn change_password(&self, ctx: &AuthContext, request: ChangePasswordRequest) -> AppResult<AuthResponse> {
        if !ctx.user.can_authenticate_with_password() {
            return Err(AppError::ValidationError("OAuth 계정은 비밀번호를 변경할 수 없습니다".to_string()));
        }

        let current_hash = ctx.user.password_hash.as_deref().unwrap_or_default();
        if !verify_password(&request.current_password, current_hash)? {
            return Err(AppError::AuthenticationError("현재 비밀번호가 일치하지 않습니다".to_string()));
        }

        let new_hash = hash_password(&request.new_password, self.bcrypt_cost)?;
        let user = self.users
            .update(&ctx.object_id()?, doc! { "password_hash": new_hash })
            .await?
            .ok_or(AuthError::UserNotFound)?;

        log::info!("비밀번호 변경: {}", ctx.user_id());
        self.issue(user)
    }

    async fn load_sub_documents(&self, kind: EntityKind, ids: &[ObjectId]) -> AppResult<Vec<Value>> {
        let mut docs = self.registry.store(kind).find_by_ids(ids).await?;

        let position = |doc: &Document| {
            doc.get_object_id("_id")
                .ok()
                .and_then(|id| ids.iter().position(|candidate| *candidate == id))
                .unwrap_or(usize::MAX)
        };
        docs.sort_by_key(|doc| position(doc));

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    async fn profile_of(&self, user: User) -> AppResult<ProfileResponse> {
        let employments = self.load_sub_documents(EntityKind::Employment, &user.employments).await?;
        let educations = self.load_sub_documents(EntityKind::Education, &user.educations).await?;

        Ok(ProfileResponse {
            user: UserResponse::from(user),
            employments,
            educations,
        })
    }

    pub async fn profile(&self, ctx: &AuthContext) -> AppResult<ProfileResponse> {
        self.profile_of(ctx.user.clone()).await
    }

    /// 프로필 편집
    ///
    /// 경력과 학력 재조정을 모두 검증한 다음에야 둘 중 하나라도 적용합니다.
    pub async fn edit_profile(&self, ctx: &AuthContext, request: EditProfileRequest) -> AppResult<ProfileResponse> {
        let owner = ctx.object_id()?;
        let user = &ctx.user;

        let employment_plan = match request.employments {
            Some(items) => Some(self.reconciler.prepare(EntityKind::Employment, &owner, &user.employments, items).await?),
            None => None,
        };
        let education_plan = match request.educations {
            Some(items) => Some(self.reconciler.prepare(EntityKind::Education, &owner, &user.educations, items).await?),
            None => None,
        };

        let mut fields = Document::new();

        if let Some(display_name) = clean_optional_string(request.display_name) {
            fields.insert("display_name", display_name);
        }
        if let Some(headline) = request.headline {
            fields.insert("headline", clean_optional_string(Some(headline)));
        }
        if let Some(bio) = request.bio {
            fields.insert("bio", clean_optional_string(Some(bio)));
        }
        if let Some(skills) = request.skills {
            fields.insert("skills", normalize_skills(skills));
        }
        if let Some(url) = request.profile_image_url {
            fields.insert("profile_image_url", clean_optional_string(Some(url)));
        }

        if let Some(plan) = employment_plan {
            fields.insert("employments", self.reconciler.apply(plan).await?);
        }
        if let Some(plan) = education_plan {
            fields.insert("educations", self.reconciler.apply(plan).await?);
        }

        let updated = self.users
            .update(&owner, fields)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.profile_of(updated).await
    }

    /// 사용자 목록 (관리자)
    pub async fn list_users(&self, query: ListUsersQuery) -> AppResult<Vec<UserResponse>> {
        let mut filter = Document::new();
        if let Some(role) = query.role {
            filter.insert("roles", role.as_str());
        }
        if let Some(status) = query.status {
            filter.insert("status", bson::to_bson(&status)?);
        }

        Ok(self.users.list(filter).await?.into_iter().map(UserResponse::from).collect())
    }

    /// 대상 사용자 조회. 슈퍼 관리자는 슈퍼 관리자만 변경할 수 있습니다.
    async fn load_target(&self, actor: &AuthContext, target_id: &str) -> AppResult<(ObjectId, User)> {
        let id = parse_object_id(target_id)?;
        let user = self.users
            .find_by_object_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        if user.roles.contains(&Role::SuperAdmin) && !actor.is_super_admin {
            return Err(AuthError::Forbidden.into());
        }

        Ok((id, user))
    }

    /// 상태 변경 (관리자). 물리 삭제는 하지 않습니다.
    pub async fn set_status(&self, actor: &AuthContext, target_id: &str, status: UserStatus) -> AppResult<UserResponse> {
        let (id, _) = self.load_target(actor, target_id).await?;

        let updated = self.users
            .update(&id, doc! { "status": bson::to_bson(&status)? })
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        log::info!("사용자 상태 변경: {} -> {:?} (by {})", target_id, status, actor.user_id());
        Ok(UserResponse::from(updated))
    }

    pub async fn deactivate(&self, actor: &AuthContext, target_id: &str) -> AppResult<UserResponse> {
        self.set_status(actor, target_id, UserStatus::Deactivated).await
    }

    /// 역할 재지정 (슈퍼 관리자)
    pub async fn assign_roles(&self, actor: &AuthContext, target_id: &str, roles: Vec<Role>) -> AppResult<UserResponse> {
        let (id, _) = self.load_target(actor, target_id).await?;

        let roles = roles.into_iter().fold(Vec::new(), |mut unique, role| {
            if !unique.contains(&role) {
                unique.push(role);
            }
            unique
        });
        let updated = self.users
            .update(&id, doc! { "roles": bson::to_bson(&roles)? })
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        log::info!("역할 변경: {} -> {:?} (by {})", target_id, roles, actor.user_id());
        Ok(UserResponse::from(updated))
    }
}
