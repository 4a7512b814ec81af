use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use crate::core::errors::{AppError, AppResult, AuthError};
use crate::domain::entities::users::user::User;
use super::authentication_request::Role;

/// 인증된 주체
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// 사용자 고유 ID (ObjectId hex)
    pub id: String,
    /// 사용자 역할 목록
    pub roles: Vec<Role>,
}

impl Principal {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// 역할 목록에 슈퍼 관리자 태그가 있는지 확인
    pub fn is_super_admin(&self) -> bool {
        self.has_role(Role::SuperAdmin)
    }
}

/// 인증 게이트를 통과한 요청에 붙는 컨텍스트
///
/// 미들웨어가 Request Extensions에 넣고, 핸들러는 추출자로 받습니다.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    /// 게이트가 조회한 사용자 레코드
    pub user: User,
    pub is_super_admin: bool,
}

impl AuthContext {
    pub fn from_user(user: User) -> AppResult<Self> {
        let id = user.id_string()
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let principal = Principal { id, roles: user.roles.clone() };
        let is_super_admin = principal.is_super_admin();

        Ok(Self { principal, user, is_super_admin })
    }

    pub fn user_id(&self) -> &str {
        &self.principal.id
    }

    pub fn object_id(&self) -> AppResult<ObjectId> {
        ObjectId::parse_str(&self.principal.id)
            .map_err(|_| AppError::InternalError("잘못된 주체 ID".to_string()))
    }
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthContext>() {
            Some(ctx) => ready(Ok(ctx.clone())),
            None => ready(Err(AuthError::Unauthenticated.into())),
        }
    }
}
