//! # Current-User Resolver
//!
//! 요청 하나를 받아 토큰이 필요한지 판단하고, 필요하면 토큰을 검증해 사용자를 찾습니다.
//! HTTP 프레임워크와 분리된 순수 로직이며 미들웨어([`AuthGate`](crate::middlewares::AuthGate))가 호출합니다.
//!
//! ## 판단 순서
//!
//! 1. 경로가 예외 패턴과 일치하면 토큰 유무와 관계없이 [`GateOutcome::Exempt`]
//! 2. `Authorization: Bearer <token>` 헤더, 없으면 (설정된 경우) JSON 본문의 `token`
//! 3. 토큰 없음 → `MissingToken`, 디코딩 실패 → `InvalidToken` / `ExpiredToken`
//! 4. 토큰은 유효하나 사용자가 없거나 비활성화됨 → `UserNotFound`, 정지됨 → `Forbidden`
//!
//! 상태를 바꾸지 않는 읽기 전용 동작입니다.

use std::sync::Arc;
use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use crate::config::AuthGateConfig;
use crate::core::errors::{AppResult, AuthError};
use crate::domain::entities::users::user::UserStatus;
use crate::domain::models::auth::AuthContext;
use crate::repositories::users::UserRepository;
use super::token_service::TokenService;

/// 게이트가 보는 요청 정보
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    pub path: &'a str,
    pub authorization: Option<&'a str>,
    /// JSON 본문 (본문 토큰을 허용한 경우에만 채워짐)
    pub body: Option<&'a Value>,
}

impl<'a> GateRequest<'a> {
    pub fn new(path: &'a str, authorization: Option<&'a str>) -> Self {
        Self { path, authorization, body: None }
    }

    pub fn with_body(mut self, body: Option<&'a Value>) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug)]
pub enum GateOutcome {
    /// 예외 경로: 인증 없이 통과
    Exempt,
    Authenticated(AuthContext),
}

pub struct CurrentUserResolver {
    tokens: Arc<TokenService>,
    users: Arc<UserRepository>,
    config: AuthGateConfig,
}

impl CurrentUserResolver {
    pub fn new(tokens: Arc<TokenService>, users: Arc<UserRepository>, config: AuthGateConfig) -> Self {
        Self { tokens, users, config }
    }

    pub fn config(&self) -> &AuthGateConfig {
        &self.config
    }

    fn extract_token<'a>(&self, request: &GateRequest<'a>) -> Result<&'a str, AuthError> {
        if let Some(header) = request.authorization {
            return TokenService::extract_bearer_token(header);
        }

        if self.config.token_in_body {
            if let Some(token) = request.body.and_then(|body| body.get("token")).and_then(Value::as_str) {
                if !token.trim().is_empty() {
                    return Ok(token.trim());
                }
            }
        }

        Err(AuthError::MissingToken)
    }

    pub async fn authenticate(&self, request: GateRequest<'_>) -> AppResult<GateOutcome> {
        if self.config.is_exempt(request.path) {
            return Ok(GateOutcome::Exempt);
        }

        let token = self.extract_token(&request)?;
        let decoded = self.tokens.decode(token)?;

        let user_id = ObjectId::parse_str(&decoded.claims.user_id)
            .map_err(|_| AuthError::UserNotFound)?;

        let user = self.users
            .find_by_object_id(&user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        match user.status {
            UserStatus::Active => {}
            UserStatus::Deactivated => return Err(AuthError::UserNotFound.into()),
            UserStatus::Suspended => return Err(AuthError::Forbidden.into()),
        }

        let context = AuthContext::from_user(user)?;
        log::debug!("인증 성공: user={} path={}", context.principal.id, request.path);

        Ok(GateOutcome::Authenticated(context))
    }
}
