//! 인증 게이트와 역할 가드
//!
//! 두 미들웨어 모두 `Transform`만 여기서 정의하고 실제 요청 처리는 `auth_inner`에 있습니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::domain::models::auth::{Role, RoleRequirement};
use crate::middlewares::auth_inner::{AuthGateService, RequireRolesService};

/// 전역 인증 게이트
///
/// `web::Data<AppState>`가 앱에 등록되어 있어야 합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
        }))
    }
}

/// 역할 가드
#[derive(Debug, Clone)]
pub struct RequireRoles {
    requirement: RoleRequirement,
}

impl RequireRoles {
    pub fn new(requirement: RoleRequirement) -> Self {
        Self { requirement }
    }

    /// 나열된 역할 중 하나 요구
    pub fn any(roles: &[Role]) -> Self {
        Self::new(RoleRequirement::any(roles))
    }

    /// 나열된 역할 모두 요구
    pub fn all(roles: &[Role]) -> Self {
        Self::new(RoleRequirement::all(roles))
    }

    pub fn super_admin_only() -> Self {
        Self::new(RoleRequirement::super_admin_only())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRoles
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RequireRolesService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRolesService {
            service: Rc::new(service),
            requirement: Rc::new(self.requirement.clone()),
        }))
    }
}
