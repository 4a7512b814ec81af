//! Stripe REST API 클라이언트
//!
//! 요청은 `application/x-www-form-urlencoded`, 인증은 `Authorization: Bearer <secret_key>`입니다.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use crate::config::StripeConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::billing::ProviderSubscription;
use super::BillingProvider;

pub struct StripeBilling {
    config: StripeConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
}

impl StripeBilling {
    pub fn new(config: StripeConfig) -> Self {
        Self { config, http: reqwest::Client::new() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), path)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response, action: &str) -> AppResult<T> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<StripeErrorBody>(&text)
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or(text);

            return Err(AppError::ExternalServiceError(format!("Stripe {} 실패 ({}): {}", action, status, message)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Stripe {} 응답 파싱 실패: {}", action, e)))
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: &[(&str, &str)], action: &str) -> AppResult<T> {
        let response = self.http
            .post(self.url(path))
            .bearer_auth(&self.config.secret_key)
            .form(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Stripe {} 요청 실패: {}", action, e)))?;

        Self::read(response, action).await
    }
}

#[async_trait]
impl BillingProvider for StripeBilling {
    async fn create_customer(&self, email: &str, name: &str) -> AppResult<String> {
        let customer: StripeCustomer = self
            .post_form("customers", &[("email", email), ("name", name)], "고객 생성")
            .await?;

        Ok(customer.id)
    }

    async fn create_subscription(&self, customer_id: &str, price_id: &str) -> AppResult<ProviderSubscription> {
        self.post_form(
            "subscriptions",
            &[("customer", customer_id), ("items[0][price]", price_id)],
            "구독 생성",
        )
        .await
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<ProviderSubscription> {
        let response = self.http
            .delete(self.url(&format!("subscriptions/{}", subscription_id)))
            .bearer_auth(&self.config.secret_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Stripe 구독 취소 요청 실패: {}", e)))?;

        Self::read(response, "구독 취소").await
    }
}
