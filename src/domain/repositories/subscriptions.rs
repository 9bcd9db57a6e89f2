use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::subscriptions::{InsertSubscriptionEntity, SubscriptionEntity};
use crate::domain::value_objects::enums::{
    billing_cycles::BillingCycle, subscription_statuses::SubscriptionStatus,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository {
    async fn insert(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
    ) -> Result<SubscriptionEntity>;

    async fn find_by_user_and_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<Option<SubscriptionEntity>>;

    async fn mark_active(
        &self,
        subscription_id: i64,
        billing_cycle: BillingCycle,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<SubscriptionEntity>;

    async fn mark_cancelled(
        &self,
        subscription_id: i64,
        cancelled_at: DateTime<Utc>,
    ) -> Result<SubscriptionEntity>;

    /// Transitions every active row whose paid period has lapsed to expired.
    /// Returns the number of rows touched.
    async fn expire_due_active(&self, now: DateTime<Utc>) -> Result<usize>;

    /// Same sweep for trial rows whose trial window has lapsed.
    async fn expire_due_trials(&self, now: DateTime<Utc>) -> Result<usize>;
}
