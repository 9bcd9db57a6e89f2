use anyhow::Result;
use async_trait::async_trait;

use crate::domain::entities::plans::{InsertPlanEntity, PlanEntity};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanRepository {
    async fn list_plans(&self) -> Result<Vec<PlanEntity>>;
    async fn find_by_id(&self, plan_id: i64) -> Result<Option<PlanEntity>>;
    async fn insert_plan(&self, insert_plan_entity: InsertPlanEntity) -> Result<i64>;
}
