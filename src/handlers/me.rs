//! 현재 사용자(`/api/v1/me`) 핸들러
//!
//! 인증 게이트를 통과한 요청만 도달하므로 [`AuthContext`]를 바로 추출합니다.

use actix_web::{get, patch, put, web, HttpResponse};
use validator::Validate;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::models::auth::AuthContext;
use crate::domain::{ChangePasswordRequest, EditProfileRequest};

/// 내 프로필 조회 (경력/학력 문서 포함)
#[get("")]
pub async fn get_me(
    state: web::Data<AppState>,
    ctx: AuthContext,
) -> Result<HttpResponse, AppError> {
    let profile = state.users.profile(&ctx).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// 프로필 편집
///
/// `employments`/`educations` 배열의 각 항목은 `action`(`create` | `update` | `delete`)을 가집니다.
/// 참조한 ID가 없거나 다른 사용자의 것이면 404와 함께 `not_found` 목록을 돌려주고 아무것도 바꾸지 않습니다.
///
/// # Endpoint
/// `PATCH /api/v1/me`
#[patch("")]
pub async fn edit_me(
    state: web::Data<AppState>,
    ctx: AuthContext,
    payload: web::Json<EditProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let profile = state.users.edit_profile(&ctx, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(profile))
}

/// 비밀번호 변경. 새 토큰 쌍을 돌려줍니다.
#[put("/password")]
pub async fn change_password(
    state: web::Data<AppState>,
    ctx: AuthContext,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state.users.change_password(&ctx, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}
