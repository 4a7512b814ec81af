//! # Application Error Handling System
//!
//! 서비스 전역에서 사용하는 통합 에러 타입입니다.
//! `thiserror`로 에러를 정의하고 `actix_web::ResponseError`를 구현하여
//! 모든 에러가 일관된 JSON 응답으로 변환되도록 합니다.
//!
//! ## HTTP 응답 매핑
//!
//! | 에러 | HTTP Status | 사용 시나리오 |
//! |------|-------------|---------------|
//! | `AuthError::MissingToken` | 401 | Authorization 헤더 없음 |
//! | `AuthError::InvalidToken` | 401 | 서명 불일치, 형식 오류 |
//! | `AuthError::ExpiredToken` | 401 | `exp` 경과 |
//! | `AuthError::Unauthenticated` | 401 | 인증 컨텍스트 없음 |
//! | `AuthError::UserNotFound` | 404 | 토큰은 유효하나 사용자 없음 |
//! | `AuthError::Forbidden` | 403 | 역할 부족 |
//! | `ValidationError` | 400 | 입력값 검증 실패 |
//! | `NotFound` / `ReferenceNotFound` | 404 | 리소스 없음 |
//! | `ConflictError` | 409 | 중복 데이터 |
//! | 나머지 | 500 | 내부 오류 (메시지는 노출하지 않음) |
//!
//! ## 응답 형식
//!
//! ```json
//! { "error": "Human readable message", "code": "expired_token" }
//! ```
//!
//! `ReferenceNotFound`는 클라이언트가 수정할 수 있도록 `not_found` 배열을 함께 돌려줍니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// 인증/인가 게이트에서 발생하는 에러
///
/// 재시도 대상이 아니며 클라이언트가 다시 인증해야 합니다.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// 토큰이 필요하지만 요청에 없음
    #[error("Authentication token is missing")]
    MissingToken,

    /// 서명 검증 실패 또는 형식 오류
    #[error("Authentication token is invalid")]
    InvalidToken,

    /// 만료된 토큰
    #[error("Authentication token has expired")]
    ExpiredToken,

    /// 토큰이 가리키는 사용자가 더 이상 존재하지 않음
    #[error("User referenced by the token was not found")]
    UserNotFound,

    /// 인증 컨텍스트가 요청에 붙어 있지 않음
    #[error("Authentication is required")]
    Unauthenticated,

    /// 역할 정책 위반
    #[error("Insufficient permissions")]
    Forbidden,
}

impl AuthError {
    /// 응답 본문의 `code` 필드 값
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::UserNotFound => "user_not_found",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden => "forbidden",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        }))
    }
}

/// 애플리케이션 전역 에러 타입
///
/// 인프라 계층(`DatabaseError`, `RedisError`, `ExternalServiceError`),
/// 비즈니스 계층(`ValidationError`, `ConflictError`, `NotFound`, `ReferenceNotFound`),
/// 보안 계층(`Auth`, `AuthenticationError`, `AuthorizationError`)으로 나뉩니다.
///
/// ```rust,ignore
/// let user = repo.find_by_id(&user_id).await?
///     .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 없음 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 참조한 하위 문서 ID 중 일부가 존재하지 않음 (404)
    ///
    /// 누락된 ID 목록을 그대로 클라이언트에 돌려줍니다.
    #[error("Referenced documents not found: {0:?}")]
    ReferenceNotFound(Vec<String>),

    /// 충돌/중복 에러 (409)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 로그인 실패 등 자격 증명 오류 (401)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 리소스 소유권 등 권한 부족 (403)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 인증 게이트 에러
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// 외부 서비스 에러 (500)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::RedisError(_) => "cache_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ReferenceNotFound(_) => "reference_not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::AuthenticationError(_) => "authentication_failed",
            AppError::AuthorizationError(_) => "insufficient_permissions",
            AppError::Auth(inner) => inner.code(),
            AppError::ExternalServiceError(_) => "external_service_error",
            AppError::InternalError(_) => "internal_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::ReferenceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::Auth(inner) => inner.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 각 변형을 HTTP 상태 코드와 JSON 본문으로 변환합니다.
    ///
    /// 5xx 에러는 상세 내용을 서버 로그에만 남기고 클라이언트에는 고정 메시지를 보냅니다.
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("{}", self);
            return HttpResponse::build(status).json(serde_json::json!({
                "error": "Internal server error",
                "code": self.code(),
            }));
        }

        match self {
            AppError::ReferenceNotFound(ids) => HttpResponse::build(status).json(serde_json::json!({
                "error": "Some referenced documents do not exist",
                "code": self.code(),
                "not_found": ids,
            })),
            _ => HttpResponse::build(status).json(serde_json::json!({
                "error": self.to_string(),
                "code": self.code(),
            })),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(e: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON 직렬화 실패: {}", e))
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        AppError::DatabaseError(format!("BSON 역직렬화 실패: {}", e))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
///
/// ```rust,ignore
/// let parsed = serde_json::from_str::<Value>(&raw).context("Failed to parse payload")?;
/// ```
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;

    /// 클로저를 사용하여 지연 평가된 컨텍스트를 제공합니다.
    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
