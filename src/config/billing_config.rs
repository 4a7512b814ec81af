//! Stripe 결제 설정

use super::env_opt;

/// Stripe API 설정
///
/// `STRIPE_SECRET_KEY`가 없으면 결제 기능이 비활성화됩니다.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// 기본값: `https://api.stripe.com/v1`
    pub api_base: String,
    /// 요청에 price가 없을 때 사용할 기본 가격 ID
    pub default_price_id: Option<String>,
}

impl StripeConfig {
    pub fn from_env() -> Option<Self> {
        let secret_key = env_opt("STRIPE_SECRET_KEY")?;

        Some(Self {
            secret_key,
            api_base: env_opt("STRIPE_API_BASE")
                .unwrap_or_else(|| "https://api.stripe.com/v1".to_string()),
            default_price_id: env_opt("STRIPE_DEFAULT_PRICE_ID"),
        })
    }
}
