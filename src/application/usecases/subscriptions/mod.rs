use std::sync::Arc;

use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
    value_objects::{
        enums::{billing_cycles::BillingCycle, subscription_statuses::SubscriptionStatus},
        subscriptions::{CurrentSubscriptionDto, PlanDto, SubscriptionModel},
    },
};

/// Every trial runs for the same fixed window, regardless of plan.
pub const TRIAL_PERIOD_DAYS: i64 = 5;

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("user already has an active subscription")]
    AlreadySubscribed,
    #[error("no subscription found")]
    SubscriptionNotFound,
    #[error("only trial subscriptions can be upgraded")]
    OnlyTrialUpgradable,
    #[error("no active subscription found")]
    NoActiveSubscription,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::PlanNotFound
            | SubscriptionError::SubscriptionNotFound
            | SubscriptionError::NoActiveSubscription => StatusCode::NOT_FOUND,
            SubscriptionError::AlreadySubscribed => StatusCode::CONFLICT,
            SubscriptionError::OnlyTrialUpgradable => StatusCode::BAD_REQUEST,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<S, P>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    subscription_repo: Arc<S>,
    plan_repo: Arc<P>,
}

impl<S, P> SubscriptionUseCase<S, P>
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    pub fn new(subscription_repo: Arc<S>, plan_repo: Arc<P>) -> Self {
        Self {
            subscription_repo,
            plan_repo,
        }
    }

    pub async fn list_plans(&self) -> UseCaseResult<Vec<PlanDto>> {
        let plans = self.plan_repo.list_plans().await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to list plans");
            SubscriptionError::Internal(err)
        })?;
        info!(plan_count = plans.len(), "subscriptions: plans loaded");
        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    /// Resolves the caller's current subscription together with its plan.
    /// A trial row takes precedence over an active one.
    pub async fn get_current(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Option<CurrentSubscriptionDto>> {
        let subscription = match self.find_current(user_id).await? {
            Some(sub) => sub,
            None => {
                info!(%user_id, "subscriptions: no current subscription");
                return Ok(None);
            }
        };

        let plan = self
            .plan_repo
            .find_by_id(subscription.plan_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    plan_id = subscription.plan_id,
                    db_error = ?err,
                    "subscriptions: failed to load plan for current subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        let Some(plan) = plan else {
            warn!(
                %user_id,
                subscription_id = subscription.id,
                plan_id = subscription.plan_id,
                "subscriptions: subscription references a missing plan"
            );
            return Ok(None);
        };

        Ok(Some(CurrentSubscriptionDto {
            subscription: SubscriptionModel::from(subscription),
            plan: PlanDto::from(plan),
        }))
    }

    pub async fn start_trial(
        &self,
        user_id: Uuid,
        plan_id: i64,
    ) -> UseCaseResult<SubscriptionModel> {
        info!(%user_id, plan_id, "subscriptions: trial requested");

        if self.find_current(user_id).await?.is_some() {
            let err = SubscriptionError::AlreadySubscribed;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "subscriptions: trial rejected, subscription already exists"
            );
            return Err(err);
        }

        self.plan_repo
            .find_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%user_id, plan_id, db_error = ?err, "subscriptions: failed to load plan for trial");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = SubscriptionError::PlanNotFound;
                warn!(
                    %user_id,
                    plan_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: trial requested for unknown plan"
                );
                err
            })?;

        let now = Utc::now();
        let subscription = self
            .subscription_repo
            .insert(
                crate::domain::entities::subscriptions::InsertSubscriptionEntity {
                    user_id,
                    plan_id,
                    status: SubscriptionStatus::Trial.to_string(),
                    billing_cycle: BillingCycle::Monthly.to_string(),
                    trial_starts_at: now,
                    trial_ends_at: now + Duration::days(TRIAL_PERIOD_DAYS),
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, plan_id, db_error = ?err, "subscriptions: failed to insert trial");
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = subscription.id,
            trial_ends_at = %subscription.trial_ends_at,
            "subscriptions: trial started"
        );

        Ok(SubscriptionModel::from(subscription))
    }

    /// Upgrades the caller's trial in place. The paid period starts now; days
    /// already consumed of the trial are not credited.
    pub async fn upgrade_to_paid(
        &self,
        user_id: Uuid,
        billing_cycle: BillingCycle,
    ) -> UseCaseResult<SubscriptionModel> {
        info!(%user_id, billing_cycle = %billing_cycle, "subscriptions: upgrade requested");

        let subscription = self.find_current(user_id).await?.ok_or_else(|| {
            let err = SubscriptionError::SubscriptionNotFound;
            warn!(
                %user_id,
                status = err.status_code().as_u16(),
                "subscriptions: upgrade requested without a subscription"
            );
            err
        })?;

        if SubscriptionStatus::from_str(&subscription.status) != SubscriptionStatus::Trial {
            let err = SubscriptionError::OnlyTrialUpgradable;
            warn!(
                %user_id,
                subscription_id = subscription.id,
                current_status = %subscription.status,
                status = err.status_code().as_u16(),
                "subscriptions: upgrade rejected for non-trial subscription"
            );
            return Err(err);
        }

        let now = Utc::now();
        let ends_at = now + Duration::days(billing_cycle.period_days());
        let updated = self
            .subscription_repo
            .mark_active(subscription.id, billing_cycle, now, ends_at)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    subscription_id = subscription.id,
                    db_error = ?err,
                    "subscriptions: failed to activate subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = updated.id,
            billing_cycle = %billing_cycle,
            ends_at = %ends_at,
            "subscriptions: upgraded to paid"
        );

        Ok(SubscriptionModel::from(updated))
    }

    /// Cancels the caller's active subscription. Trials are not cancellable,
    /// they simply run out and expire.
    pub async fn cancel(&self, user_id: Uuid) -> UseCaseResult<SubscriptionModel> {
        let subscription = self
            .subscription_repo
            .find_by_user_and_status(user_id, SubscriptionStatus::Active)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load subscription for cancel");
                SubscriptionError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = SubscriptionError::NoActiveSubscription;
                warn!(
                    %user_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: no active subscription to cancel"
                );
                err
            })?;

        let updated = self
            .subscription_repo
            .mark_cancelled(subscription.id, Utc::now())
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    subscription_id = subscription.id,
                    db_error = ?err,
                    "subscriptions: failed to cancel subscription"
                );
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            subscription_id = updated.id,
            "subscriptions: subscription cancelled"
        );

        Ok(SubscriptionModel::from(updated))
    }

    async fn find_current(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Option<crate::domain::entities::subscriptions::SubscriptionEntity>> {
        let trial = self
            .subscription_repo
            .find_by_user_and_status(user_id, SubscriptionStatus::Trial)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load trial subscription");
                SubscriptionError::Internal(err)
            })?;

        if trial.is_some() {
            return Ok(trial);
        }

        self.subscription_repo
            .find_by_user_and_status(user_id, SubscriptionStatus::Active)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load active subscription");
                SubscriptionError::Internal(err)
            })
    }
}
