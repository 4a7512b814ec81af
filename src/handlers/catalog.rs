//! 카탈로그 핸들러
//!
//! 회사, 학교, 강좌, 시험, 문항, 답안이 같은 CRUD 형태를 공유하므로
//! 페이로드 타입 `T`에 대해 제네릭으로 한 번만 정의합니다. `T::KIND`가 대상 컬렉션을 결정합니다.
//!
//! 쓰기 권한은 라우트 설정에서 종류별로 붙습니다.

use actix_web::{web, HttpResponse};
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::catalog::{CatalogListQuery, CatalogPayload};
use crate::domain::models::auth::AuthContext;

/// `GET /{kind}` (`?parent=<id>`)
pub async fn list<T: CatalogPayload>(
    state: web::Data<AppState>,
    query: web::Query<CatalogListQuery>,
) -> Result<HttpResponse, AppError> {
    let records = state.catalog.list(T::KIND, query.parent.as_deref()).await?;

    Ok(HttpResponse::Ok().json(records))
}

/// `GET /{kind}/{id}`
pub async fn get<T: CatalogPayload>(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let record = state.catalog.get(T::KIND, &id).await?;

    Ok(HttpResponse::Ok().json(record))
}

/// `POST /{kind}`. 부모 ID가 없으면 404 `reference_not_found`.
pub async fn create<T: CatalogPayload>(
    state: web::Data<AppState>,
    ctx: AuthContext,
    payload: web::Json<T>,
) -> Result<HttpResponse, AppError> {
    let created_by = ctx.object_id()?;
    let record = state.catalog.create(&created_by, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(record))
}

/// `PUT /{kind}/{id}`
pub async fn update<T: CatalogPayload>(
    state: web::Data<AppState>,
    id: web::Path<String>,
    payload: web::Json<T>,
) -> Result<HttpResponse, AppError> {
    let record = state.catalog.update(&id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(record))
}

/// `DELETE /{kind}/{id}`: 자손 레코드까지 함께 삭제
pub async fn delete<T: CatalogPayload>(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let removed = state.catalog.delete(T::KIND, &id).await?;
    log::info!("{} 삭제: {} (연쇄 삭제 포함 {}건)", T::KIND, id.as_str(), removed);

    Ok(HttpResponse::NoContent().finish())
}
