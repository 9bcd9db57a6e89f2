use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;

use crate::{
    application::usecases::subscriptions::SubscriptionUseCase,
    auth::AuthUser,
    domain::{
        repositories::{plans::PlanRepository, subscriptions::SubscriptionRepository},
        value_objects::{
            enums::billing_cycles::BillingCycle,
            subscriptions::{StartTrialRequest, UpgradeRequest},
        },
    },
    infrastructure::{
        axum_http::error_responses::AppError,
        postgres::{
            postgres_connection::PgPool,
            repositories::{plans::PlanPostgres, subscriptions::SubscriptionPostgres},
        },
    },
};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let subscription_repo = SubscriptionPostgres::new(Arc::clone(&db_pool));
    let plan_repo = PlanPostgres::new(Arc::clone(&db_pool));
    let subscriptions_usecase =
        SubscriptionUseCase::new(Arc::new(subscription_repo), Arc::new(plan_repo));

    Router::new()
        .route("/plans", get(list_plans))
        .route("/current", get(get_current))
        .route("/trial", post(start_trial))
        .route("/upgrade", post(upgrade_to_paid))
        .route("/cancel", post(cancel))
        .with_state(Arc::new(subscriptions_usecase))
}

pub async fn list_plans<S, P>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    _auth: AuthUser,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match subscriptions_usecase.list_plans().await {
        Ok(plans) => (StatusCode::OK, Json(plans)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_current<S, P>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    auth: AuthUser,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match subscriptions_usecase.get_current(auth.user_id).await {
        Ok(Some(current)) => (StatusCode::OK, Json(current)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn start_trial<S, P>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    auth: AuthUser,
    Json(start_trial_request): Json<StartTrialRequest>,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match subscriptions_usecase
        .start_trial(auth.user_id, start_trial_request.plan_id)
        .await
    {
        Ok(subscription) => (StatusCode::CREATED, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn upgrade_to_paid<S, P>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    auth: AuthUser,
    Json(upgrade_request): Json<UpgradeRequest>,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    let Some(billing_cycle) = BillingCycle::from_str(&upgrade_request.billing_cycle) else {
        return AppError::BadRequest(format!(
            "invalid billing cycle: {}",
            upgrade_request.billing_cycle
        ))
        .into_response();
    };

    match subscriptions_usecase
        .upgrade_to_paid(auth.user_id, billing_cycle)
        .await
    {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn cancel<S, P>(
    State(subscriptions_usecase): State<Arc<SubscriptionUseCase<S, P>>>,
    auth: AuthUser,
) -> Response
where
    S: SubscriptionRepository + Send + Sync + 'static,
    P: PlanRepository + Send + Sync + 'static,
{
    match subscriptions_usecase.cancel(auth.user_id).await {
        Ok(subscription) => (StatusCode::OK, Json(subscription)).into_response(),
        Err(err) => err.into_response(),
    }
}
