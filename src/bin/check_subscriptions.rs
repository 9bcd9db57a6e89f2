use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing::{error, info};

use sales_saas::{
    application::usecases::expire_subscriptions::ExpireSubscriptionsUseCase,
    config::config_loader,
    infrastructure::postgres::{
        postgres_connection, repositories::subscriptions::SubscriptionPostgres,
    },
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Subscription check exited with error: {}", error);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let subscription_repo = Arc::new(SubscriptionPostgres::new(Arc::new(postgres_pool)));
    let usecase = ExpireSubscriptionsUseCase::new(subscription_repo);

    info!("Checking for expired subscriptions...");
    let result = usecase.run(Utc::now()).await?;
    info!(
        expired_active = result.expired_active,
        expired_trials = result.expired_trials,
        "Subscription check completed"
    );

    Ok(())
}
