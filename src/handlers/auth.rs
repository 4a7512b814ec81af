//! Authentication HTTP Handlers
//!
//! 가입, 로그인, 토큰 갱신, Google OAuth 엔드포인트입니다.
//! 모두 인증 게이트의 예외 경로(`/api/v1/auth/*`)에 있습니다.
//!
//! # Auth Providers
//!
//! - **로컬 인증**: 이메일/패스워드 방식 (`POST /auth/register`, `POST /auth/login`)
//! - **OAuth 2.0**: Google OAuth 인증 (`GET /auth/google/login`, `/callback`)
//! - **토큰 갱신**: 리프레시 토큰으로 새 토큰 쌍 발급 (`POST /auth/refresh`)
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::{LoginRequest, OAuthCallbackQuery, RefreshTokenRequest, RegisterRequest};

/// 로컬 회원가입 핸들러
///
/// # Endpoint
/// `POST /auth/register`
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state.users.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

/// 로컬 로그인 핸들러
///
/// # Endpoint
/// `POST /auth/login`
#[post("/login")]
pub async fn local_login(
    state: web::Data<AppState>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = state.users.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Google OAuth 로그인 URL 생성
///
/// # Endpoint
/// `GET /auth/google/login`
#[get("/google/login")]
pub async fn google_login_url(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let url_response = state.google()?.login_url()?;

    Ok(HttpResponse::Ok().json(url_response))
}

/// Google OAuth 콜백 처리 핸들러
///
/// # Endpoint
/// `GET /auth/google/callback?code={code}&state={state}`
#[get("/google/callback")]
pub async fn google_oauth_callback(
    state: web::Data<AppState>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    // 사용자가 거부했거나 Google 쪽에서 에러
    if let Some(error) = &query.error {
        let error_msg = query.error_description
            .as_deref()
            .unwrap_or("OAuth 인증이 취소되었거나 실패했습니다");
        log::warn!("Google OAuth 에러: {} - {}", error, error_msg);
        return Err(AppError::AuthenticationError(error_msg.to_string()));
    }

    query.validate()?;

    let response = state
        .google()?
        .authenticate_with_code(&query.code, &query.state)
        .await?;

    log::info!("Google OAuth 로그인 성공: {}", response.user.email);
    Ok(HttpResponse::Ok().json(response))
}

/// 토큰 갱신 엔드포인트
///
/// 리프레시 토큰은 `refresh_token` 쿠키 또는 요청 본문에서 읽습니다.
///
/// # Endpoint
/// `POST /auth/refresh`
#[post("/refresh")]
pub async fn refresh_tokens(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> Result<HttpResponse, AppError> {
    let rt = extract_refresh_token(&req, body.as_deref())?;

    let response = state.users.refresh(&rt).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// HTTP 요청에서 리프레시 토큰 추출 (쿠키 우선)
fn extract_refresh_token(
    req: &HttpRequest,
    body: Option<&RefreshTokenRequest>,
) -> Result<String, AppError> {
    if let Some(cookie) = req.cookie("refresh_token") {
        let token = cookie.value().trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    if let Some(body) = body {
        if !body.refresh_token.trim().is_empty() {
            return Ok(body.refresh_token.trim().to_string());
        }
    }

    Err(AppError::AuthenticationError(
        "리프레시 토큰이 제공되지 않았습니다".to_string()
    ))
}
