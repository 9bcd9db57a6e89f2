use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{plans::PlanEntity, subscriptions::SubscriptionEntity};
use crate::domain::value_objects::enums::{
    billing_cycles::BillingCycle, subscription_statuses::SubscriptionStatus,
};
use crate::domain::value_objects::plans::PlanFeatures;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionModel {
    pub id: i64,
    pub user_id: Uuid,
    pub plan_id: i64,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub trial_starts_at: DateTime<Utc>,
    pub trial_ends_at: DateTime<Utc>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<SubscriptionEntity> for SubscriptionModel {
    fn from(value: SubscriptionEntity) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            plan_id: value.plan_id,
            status: SubscriptionStatus::from_str(&value.status),
            billing_cycle: BillingCycle::from_str(&value.billing_cycle)
                .unwrap_or(BillingCycle::Monthly),
            trial_starts_at: value.trial_starts_at,
            trial_ends_at: value.trial_ends_at,
            starts_at: value.starts_at,
            ends_at: value.ends_at,
            cancelled_at: value.cancelled_at,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_monthly_minor: i32,
    pub price_annual_minor: i32,
    pub features: PlanFeatures,
}

impl From<PlanEntity> for PlanDto {
    fn from(value: PlanEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price_monthly_minor: value.price_monthly_minor,
            price_annual_minor: value.price_annual_minor,
            features: PlanFeatures::from_stored(&value.features),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CurrentSubscriptionDto {
    pub subscription: SubscriptionModel,
    pub plan: PlanDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartTrialRequest {
    pub plan_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeRequest {
    pub billing_cycle: String,
}
