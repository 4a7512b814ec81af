//! # User Administration HTTP Handlers
//!
//! 관리자용 사용자 관리 엔드포인트입니다. 사용자는 물리적으로 삭제되지 않고 상태만 바뀝니다.
//!
//! | 메서드 | 경로 | 설명 | 필요 역할 |
//! |--------|------|------|-----------|
//! | `GET` | `/users` | 사용자 목록 (`?role=`, `?status=`) | admin |
//! | `PUT` | `/users/{id}/status` | 상태 변경 | admin |
//! | `DELETE` | `/users/{id}` | 비활성화 (soft delete) | admin |
//! | `PUT` | `/users/{id}/roles` | 역할 재지정 | super_admin |
//!
//! 역할 검사는 라우트 설정에서 [`RequireRoles`](crate::middlewares::RequireRoles)로 붙습니다.
//! 슈퍼 관리자 계정은 슈퍼 관리자만 변경할 수 있습니다.

use actix_web::{delete, get, put, web, HttpResponse};
use validator::Validate;
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::models::auth::AuthContext;
use crate::domain::{AssignRolesRequest, ListUsersQuery, SetStatusRequest};
use crate::middlewares::RequireRoles;

#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<ListUsersQuery>,
) -> Result<HttpResponse, AppError> {
    let users = state.users.list_users(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(users))
}

#[put("/{user_id}/status")]
pub async fn set_user_status(
    state: web::Data<AppState>,
    ctx: AuthContext,
    user_id: web::Path<String>,
    payload: web::Json<SetStatusRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = state.users.set_status(&ctx, &user_id, payload.status).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// 사용자 비활성화
///
/// 비활성화된 사용자의 토큰은 게이트에서 `UserNotFound`로 거부됩니다.
#[delete("/{user_id}")]
pub async fn deactivate_user(
    state: web::Data<AppState>,
    ctx: AuthContext,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.users.deactivate(&ctx, &user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 역할 재지정
///
/// 스코프의 admin 가드 안쪽에서 슈퍼 관리자 가드가 한 번 더 적용됩니다.
#[put("/{user_id}/roles", wrap = "RequireRoles::super_admin_only()")]
pub async fn assign_roles(
    state: web::Data<AppState>,
    ctx: AuthContext,
    user_id: web::Path<String>,
    payload: web::Json<AssignRolesRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = state.users.assign_roles(&ctx, &user_id, payload.into_inner().roles).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use crate::core::state::testing::{in_memory_state, seed_user};
    use crate::domain::models::auth::Role;
    use crate::middlewares::AuthGate;
    use crate::routes::configure_all_routes;
    use super::*;

    #[actix_web::test]
    async fn test_admin_lists_and_filters_users() {
        let state = web::Data::new(in_memory_state());
        let (_, admin) = seed_user(&state, "adam", &[Role::Admin]).await;
        seed_user(&state, "hugo", &[Role::HrAdmin]).await;
        seed_user(&state, "tara", &[Role::Talent]).await;
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users?role=hr_admin")
            .insert_header(("Authorization", admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let users = body.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["username"], json!("hugo"));
    }

    #[actix_web::test]
    async fn test_talent_cannot_list_users() {
        let state = web::Data::new(in_memory_state());
        let (_, talent) = seed_user(&state, "tom", &[Role::Talent]).await;
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(("Authorization", talent))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_deactivated_user_loses_access() {
        let state = web::Data::new(in_memory_state());
        let (_, admin) = seed_user(&state, "ava", &[Role::Admin]).await;
        let (target, target_header) = seed_user(&state, "leo", &[Role::Talent]).await;
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/users/{}", target.id_string().unwrap()))
            .insert_header(("Authorization", admin))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::get()
            .uri("/api/v1/me")
            .insert_header(("Authorization", target_header))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_role_assignment_is_super_admin_only() {
        let state = web::Data::new(in_memory_state());
        let (_, admin) = seed_user(&state, "alex", &[Role::Admin]).await;
        let (_, root) = seed_user(&state, "root", &[Role::SuperAdmin]).await;
        let (target, _) = seed_user(&state, "rita", &[Role::Talent]).await;
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let uri = format!("/api/v1/users/{}/roles", target.id_string().unwrap());

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(("Authorization", admin))
            .set_json(json!({ "roles": ["recruiter"] }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header(("Authorization", root))
            .set_json(json!({ "roles": ["recruiter", "talent", "recruiter"] }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["roles"], json!(["recruiter", "talent"]));
    }

    #[actix_web::test]
    async fn test_admin_cannot_suspend_super_admin() {
        let state = web::Data::new(in_memory_state());
        let (_, admin) = seed_user(&state, "amy", &[Role::Admin]).await;
        let (root, _) = seed_user(&state, "sudo", &[Role::SuperAdmin]).await;
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/users/{}/status", root.id_string().unwrap()))
            .insert_header(("Authorization", admin))
            .set_json(json!({ "status": "suspended" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }
}
