//! 구독 결제
//!
//! 결제 프로바이더는 [`BillingProvider`] 트레이트 뒤에 숨겨져 있으며
//! 운영에서는 [`stripe::StripeBilling`]이 주입됩니다.

pub mod stripe;
pub mod subscription_service;

use async_trait::async_trait;
use crate::core::errors::AppResult;
use crate::domain::dto::billing::ProviderSubscription;

pub use stripe::StripeBilling;
pub use subscription_service::SubscriptionService;

#[async_trait]
pub trait BillingProvider: Send + Sync {
    /// 고객을 만들고 프로바이더 측 고객 ID를 돌려줍니다.
    async fn create_customer(&self, email: &str, name: &str) -> AppResult<String>;

    async fn create_subscription(&self, customer_id: &str, price_id: &str) -> AppResult<ProviderSubscription>;

    async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<ProviderSubscription>;
}
