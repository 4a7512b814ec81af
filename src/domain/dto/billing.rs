//! 구독 결제 DTO

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    /// 없으면 `STRIPE_DEFAULT_PRICE_ID`를 사용
    #[validate(length(min = 1, message = "price_id가 비어 있습니다"))]
    pub price_id: Option<String>,
}

/// 결제 프로바이더가 돌려준 구독 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSubscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub current_period_end: Option<i64>,
}
