//! 인증 게이트와 역할 가드의 실제 요청 처리
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use crate::core::errors::{AppError, AuthError};
use crate::core::state::AppState;
use crate::domain::models::auth::{AuthContext, RoleRequirement};
use crate::services::auth::{GateOutcome, GateRequest};

/// 에러를 JSON 응답으로 바꿔 요청을 종료
fn reject<B>(req: ServiceRequest, error: &dyn ResponseError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(error.error_response()).map_into_right_body()
}

pub struct AuthGateService<S> {
    pub service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                log::error!("AppState가 등록되지 않아 인증 게이트를 실행할 수 없습니다");
                let error = AppError::InternalError("application state missing".to_string());
                return Ok(reject(req, &error));
            };

            let path = req.path().to_string();
            let authorization = req
                .headers()
                .get(AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .map(str::to_owned);

            let body = if should_read_body(&req, &state, &path, authorization.is_some()) {
                read_json_body(&mut req).await?
            } else {
                None
            };

            let gate_request = GateRequest::new(&path, authorization.as_deref()).with_body(body.as_ref());

            match state.resolver.authenticate(gate_request).await {
                Ok(GateOutcome::Exempt) => {
                    log::debug!("예외 경로 통과: {}", path);
                }
                Ok(GateOutcome::Authenticated(context)) => {
                    req.extensions_mut().insert(context);
                }
                Err(error) => {
                    log::warn!("인증 실패: {} ({})", path, error);
                    return Ok(reject(req, &error));
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 본문 토큰을 허용했고 헤더가 없는 JSON 요청만 본문을 읽습니다.
fn should_read_body(req: &ServiceRequest, state: &AppState, path: &str, has_header: bool) -> bool {
    let config = state.resolver.config();

    if has_header || !config.token_in_body || config.is_exempt(path) {
        return false;
    }

    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false)
}

/// 본문을 읽어 JSON으로 파싱하고, 핸들러가 다시 읽을 수 있도록 payload를 되돌려 놓습니다.
async fn read_json_body(req: &mut ServiceRequest) -> Result<Option<Value>, Error> {
    let bytes = req.extract::<web::Bytes>().await?;
    let value = serde_json::from_slice::<Value>(&bytes).ok();
    req.set_payload(Payload::from(bytes));
    Ok(value)
}

pub struct RequireRolesService<S> {
    pub service: Rc<S>,
    pub requirement: Rc<RoleRequirement>,
}

impl<S, B> Service<ServiceRequest> for RequireRolesService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let requirement = self.requirement.clone();

        Box::pin(async move {
            let verdict = match req.extensions().get::<AuthContext>() {
                None => Err(AuthError::Unauthenticated),
                Some(ctx) if requirement.is_satisfied(&ctx.principal) => Ok(()),
                Some(ctx) => {
                    log::warn!(
                        "권한 부족: 사용자 ID {} ({:?}), 필요 권한: {:?}",
                        ctx.principal.id, ctx.principal.roles, requirement
                    );
                    Err(AuthError::Forbidden)
                }
            };

            if let Err(error) = verdict {
                return Ok(reject(req, &error));
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
