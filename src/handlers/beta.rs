//! 베타 신청 핸들러 (인증 불필요)

use actix_web::{post, web, HttpResponse};
use crate::core::errors::AppError;
use crate::core::state::AppState;
use crate::domain::dto::beta::BetaSignupRequest;

/// # Endpoint
/// `POST /api/v1/beta/signup`
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<AppState>,
    payload: web::Json<BetaSignupRequest>,
) -> Result<HttpResponse, AppError> {
    let signup = state.beta.sign_up(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(signup))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use crate::core::state::testing::in_memory_state;
    use crate::middlewares::AuthGate;
    use crate::routes::configure_all_routes;
    use super::*;

    #[actix_web::test]
    async fn test_signup_is_public_and_rejects_duplicates() {
        let state = web::Data::new(in_memory_state());
        let app = test::init_service(
            App::new().app_data(state.clone()).wrap(AuthGate).configure(configure_all_routes),
        )
        .await;

        let signup = || {
            test::TestRequest::post()
                .uri("/api/v1/beta/signup")
                .set_json(json!({ "email": "early@example.com", "name": "Early" }))
                .to_request()
        };

        assert_eq!(test::call_service(&app, signup()).await.status(), StatusCode::CREATED);
        assert_eq!(test::call_service(&app, signup()).await.status(), StatusCode::CONFLICT);
    }
}
