//! 구독 결제 핸들러
//!
//! 결제 설정이 없으면 모든 엔드포인트가 500 `external_service_error`로 응답합니다.

use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::billing::CreateSubscriptionRequest;
use crate::domain::models::auth::AuthContext;

/// 구독 생성. 본문이 없으면 기본 가격으로 구독합니다.
#[post("")]
pub async fn create_subscription(
    state: web::Data<AppState>,
    ctx: AuthContext,
    payload: Option<web::Json<CreateSubscriptionRequest>>,
) -> Result<HttpResponse, AppError> {
    let request = payload.map(web::Json::into_inner).unwrap_or_default();
    request.validate()?;

    let subscription = state.billing()?.subscribe(&ctx, request).await?;

    Ok(HttpResponse::Created().json(subscription))
}

#[get("")]
pub async fn list_subscriptions(
    state: web::Data<AppState>,
    ctx: AuthContext,
) -> Result<HttpResponse, AppError> {
    let subscriptions = state.billing()?.list(&ctx).await?;

    Ok(HttpResponse::Ok().json(subscriptions))
}

#[delete("/{subscription_id}")]
pub async fn cancel_subscription(
    state: web::Data<AppState>,
    ctx: AuthContext,
    subscription_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let subscription = state.billing()?.cancel(&ctx, &subscription_id).await?;

    Ok(HttpResponse::Ok().json(subscription))
}
