use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use sales_saas::{
    config::config_loader,
    domain::{
        entities::plans::InsertPlanEntity, repositories::plans::PlanRepository,
        value_objects::plans::PlanFeatures,
    },
    infrastructure::postgres::{postgres_connection, repositories::plans::PlanPostgres},
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        error!("Plan seeding exited with error: {}", error);
        std::process::exit(1);
    }
}

fn default_plans() -> Vec<InsertPlanEntity> {
    vec![
        InsertPlanEntity {
            name: "Starter".to_string(),
            description: Some("For getting started".to_string()),
            price_monthly_minor: 4500,
            price_annual_minor: 32000,
            features: PlanFeatures::from(vec![
                "Up to 100 sales/month",
                "Basic dashboard",
                "Simple reports",
                "Email support",
                "5-day free trial",
            ])
            .to_stored(),
        },
        InsertPlanEntity {
            name: "Professional".to_string(),
            description: Some("For growing teams".to_string()),
            price_monthly_minor: 9900,
            price_annual_minor: 71280,
            features: PlanFeatures::from(vec![
                "Up to 1,000 sales/month",
                "Advanced dashboard",
                "Detailed reports",
                "Priority support",
                "Integrations",
                "5-day free trial",
            ])
            .to_stored(),
        },
        InsertPlanEntity {
            name: "Enterprise".to_string(),
            description: Some("For scaling up".to_string()),
            price_monthly_minor: 29900,
            price_annual_minor: 215280,
            features: PlanFeatures::from(vec![
                "Unlimited sales",
                "Customizable dashboard",
                "Real-time reports",
                "24/7 support",
                "Advanced integrations",
                "Full API access",
                "5-day free trial",
            ])
            .to_stored(),
        },
    ]
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let dotenvy_env = config_loader::load()?;
    info!("ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let plan_repo = Arc::new(PlanPostgres::new(Arc::new(postgres_pool)));

    info!("Seeding plans...");
    for plan in default_plans() {
        let name = plan.name.clone();
        let plan_id = plan_repo.insert_plan(plan).await?;
        info!(plan_id, "Created plan: {}", name);
    }
    info!("Plans seeded successfully");

    Ok(())
}
