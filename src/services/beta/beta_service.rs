//! 베타 신청 접수

use std::sync::Arc;
use mongodb::bson::{doc, DateTime};
use serde_json::Value;
use validator::Validate;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::beta::BetaSignupRequest;
use crate::repositories::document_store::DocumentStore;
use crate::utils::document::document_to_json;
use crate::utils::string_utils::clean_optional_string;

pub struct BetaSignupService {
    store: Arc<dyn DocumentStore>,
}

impl BetaSignupService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// 같은 이메일로 두 번 신청하면 `ConflictError`
    pub async fn sign_up(&self, request: BetaSignupRequest) -> AppResult<Value> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();

        if self.store.find_one(doc! { "email": email.as_str() }).await?.is_some() {
            return Err(AppError::ConflictError("이미 신청한 이메일입니다".to_string()));
        }

        let created = self.store
            .create(doc! {
                "email": email.as_str(),
                "name": clean_optional_string(request.name),
                "created_at": DateTime::now(),
            })
            .await?;

        log::info!("베타 신청: {}", email);
        Ok(document_to_json(created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::memory_store::InMemoryDocumentStore;

    #[actix_web::test]
    async fn test_duplicate_signup_conflicts() {
        let service = BetaSignupService::new(Arc::new(InMemoryDocumentStore::new("beta_signups")));

        let created = service
            .sign_up(BetaSignupRequest { email: "Early@Example.com".to_string(), name: Some(" Early ".to_string()) })
            .await
            .unwrap();
        assert_eq!(created["email"], "early@example.com");
        assert_eq!(created["name"], "Early");

        let again = service
            .sign_up(BetaSignupRequest { email: "early@example.com".to_string(), name: None })
            .await;
        assert!(matches!(again, Err(AppError::ConflictError(_))));
    }

    #[actix_web::test]
    async fn test_invalid_email_rejected() {
        let service = BetaSignupService::new(Arc::new(InMemoryDocumentStore::new("beta_signups")));

        let result = service.sign_up(BetaSignupRequest { email: "nope".to_string(), name: None }).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
