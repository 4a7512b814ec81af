//! 구독 생성/조회/취소
//!
//! 구독 레코드는 `subscriptions` 컬렉션에 `user` 역참조와 함께 저장됩니다.
//! 사용자의 결제 고객 ID는 처음 구독할 때 만들어 사용자 레코드에 보관합니다.

use std::sync::Arc;
use mongodb::bson::{doc, DateTime};
use serde_json::Value;
use crate::core::errors::{AppError, AppResult, AuthError};
use crate::domain::dto::billing::CreateSubscriptionRequest;
use crate::domain::models::auth::AuthContext;
use crate::repositories::document_store::DocumentStore;
use crate::repositories::users::UserRepository;
use crate::utils::document::{document_to_json, parse_object_id};
use super::BillingProvider;

pub struct SubscriptionService {
    provider: Arc<dyn BillingProvider>,
    users: Arc<UserRepository>,
    store: Arc<dyn DocumentStore>,
    default_price_id: Option<String>,
}

impl SubscriptionService {
    pub fn new(
        provider: Arc<dyn BillingProvider>,
        users: Arc<UserRepository>,
        store: Arc<dyn DocumentStore>,
        default_price_id: Option<String>,
    ) -> Self {
        Self { provider, users, store, default_price_id }
    }

    async fn ensure_customer(&self, ctx: &AuthContext) -> AppResult<String> {
        if let Some(customer_id) = &ctx.user.stripe_customer_id {
            return Ok(customer_id.clone());
        }

        let customer_id = self.provider
            .create_customer(&ctx.user.email, &ctx.user.display_name)
            .await?;

        self.users
            .update(&ctx.object_id()?, doc! { "stripe_customer_id": customer_id.as_str() })
            .await?;

        log::info!("결제 고객 생성: user={} customer={}", ctx.user_id(), customer_id);
        Ok(customer_id)
    }

    pub async fn subscribe(&self, ctx: &AuthContext, request: CreateSubscriptionRequest) -> AppResult<Value> {
        let price_id = request
            .price_id
            .or_else(|| self.default_price_id.clone())
            .ok_or_else(|| AppError::ValidationError("price_id가 필요합니다".to_string()))?;

        let customer_id = self.ensure_customer(ctx).await?;
        let subscription = self.provider.create_subscription(&customer_id, &price_id).await?;

        let now = DateTime::now();
        let created = self.store
            .create(doc! {
                "user": ctx.object_id()?,
                "stripe_subscription_id": subscription.id.as_str(),
                "stripe_customer_id": customer_id.as_str(),
                "price_id": price_id.as_str(),
                "status": subscription.status.as_str(),
                "current_period_end": subscription.current_period_end,
                "created_at": now,
                "updated_at": now,
            })
            .await?;

        log::info!("구독 생성: user={} subscription={}", ctx.user_id(), subscription.id);
        Ok(document_to_json(created))
    }

    pub async fn list(&self, ctx: &AuthContext) -> AppResult<Vec<Value>> {
        let docs = self.store.find(doc! { "user": ctx.object_id()? }).await?;
        Ok(docs.into_iter().map(document_to_json).collect())
    }

    /// 구독 취소 (본인 또는 슈퍼 관리자)
    pub async fn cancel(&self, ctx: &AuthContext, id: &str) -> AppResult<Value> {
        let id = parse_object_id(id)?;

        let record = self.store
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("구독을 찾을 수 없습니다".to_string()))?;

        let owner = record.get_object_id("user").ok();
        if owner != Some(ctx.object_id()?) && !ctx.is_super_admin {
            return Err(AuthError::Forbidden.into());
        }

        let subscription_id = record
            .get_str("stripe_subscription_id")
            .map_err(|e| AppError::DatabaseError(format!("구독 레코드 손상: {}", e)))?;

        let cancelled = self.provider.cancel_subscription(subscription_id).await?;

        let updated = self.store
            .update_by_id(&id, doc! { "status": cancelled.status.as_str(), "updated_at": DateTime::now() })
            .await?
            .ok_or_else(|| AppError::NotFound("구독을 찾을 수 없습니다".to_string()))?;

        log::info!("구독 취소: user={} subscription={}", ctx.user_id(), cancelled.id);
        Ok(document_to_json(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use async_trait::async_trait;
    use crate::domain::dto::billing::ProviderSubscription;
    use crate::domain::entities::users::user::User;
    use crate::repositories::memory_store::InMemoryDocumentStore;

    #[derive(Default)]
    struct FakeProvider {
        customers: Mutex<u32>,
    }

    #[async_trait]
    impl BillingProvider for FakeProvider {
        async fn create_customer(&self, _email: &str, _name: &str) -> AppResult<String> {
            let mut count = self.customers.lock().unwrap();
            *count += 1;
            Ok(format!("cus_{}", count))
        }

        async fn create_subscription(&self, _customer_id: &str, price_id: &str) -> AppResult<ProviderSubscription> {
            Ok(ProviderSubscription { id: format!("sub_{}", price_id), status: "active".to_string(), current_period_end: None })
        }

        async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<ProviderSubscription> {
            Ok(ProviderSubscription { id: subscription_id.to_string(), status: "canceled".to_string(), current_period_end: None })
        }
    }

    struct Fixture {
        service: SubscriptionService,
        provider: Arc<FakeProvider>,
        users: Arc<UserRepository>,
    }

    fn fixture(default_price: Option<&str>) -> Fixture {
        let provider = Arc::new(FakeProvider::default());
        let users = Arc::new(UserRepository::new(Arc::new(InMemoryDocumentStore::new("users")), None, 60));
        let service = SubscriptionService::new(
            provider.clone(),
            users.clone(),
            Arc::new(InMemoryDocumentStore::new("subscriptions")),
            default_price.map(str::to_string),
        );

        Fixture { service, provider, users }
    }

    async fn context(users: &UserRepository, email: &str, username: &str) -> AuthContext {
        let user = users
            .create(User::new_local(email.to_string(), username.to_string(), "Payer".to_string(), "hash".to_string()))
            .await
            .unwrap();
        AuthContext::from_user(user).unwrap()
    }

    #[actix_web::test]
    async fn test_subscribe_creates_customer_once() {
        let f = fixture(Some("price_basic"));
        let ctx = context(&f.users, "pay@example.com", "payer").await;

        let created = f.service.subscribe(&ctx, CreateSubscriptionRequest::default()).await.unwrap();
        assert_eq!(created["stripe_subscription_id"], "sub_price_basic");
        assert_eq!(created["user"], ctx.user_id());

        let stored = f.users.find_by_id(ctx.user_id()).await.unwrap().unwrap();
        assert_eq!(stored.stripe_customer_id.as_deref(), Some("cus_1"));

        let refreshed = AuthContext::from_user(stored).unwrap();
        f.service
            .subscribe(&refreshed, CreateSubscriptionRequest { price_id: Some("price_pro".to_string()) })
            .await
            .unwrap();
        assert_eq!(*f.provider.customers.lock().unwrap(), 1);
        assert_eq!(f.service.list(&refreshed).await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_price_is_required_without_default() {
        let f = fixture(None);
        let ctx = context(&f.users, "np@example.com", "noprice").await;

        let result = f.service.subscribe(&ctx, CreateSubscriptionRequest::default()).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_web::test]
    async fn test_only_owner_can_cancel() {
        let f = fixture(Some("price_basic"));
        let owner = context(&f.users, "owner@example.com", "owner").await;
        let other = context(&f.users, "other@example.com", "other").await;

        let created = f.service.subscribe(&owner, CreateSubscriptionRequest::default()).await.unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let denied = f.service.cancel(&other, &id).await;
        assert!(matches!(denied, Err(AppError::Auth(AuthError::Forbidden))));

        let cancelled = f.service.cancel(&owner, &id).await.unwrap();
        assert_eq!(cancelled["status"], "canceled");
    }
}
