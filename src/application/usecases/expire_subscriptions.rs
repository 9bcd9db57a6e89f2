use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::repositories::subscriptions::SubscriptionRepository;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpireSubscriptionsResult {
    pub expired_active: usize,
    pub expired_trials: usize,
}

impl ExpireSubscriptionsResult {
    pub fn total(&self) -> usize {
        self.expired_active + self.expired_trials
    }
}

/// Single batch pass over the subscriptions table. The predicate is
/// re-evaluated against `now` on every invocation, so re-running after a
/// partial failure converges without a progress cursor.
pub struct ExpireSubscriptionsUseCase {
    subscription_repo: Arc<dyn SubscriptionRepository + Send + Sync>,
}

impl ExpireSubscriptionsUseCase {
    pub fn new(subscription_repo: Arc<dyn SubscriptionRepository + Send + Sync>) -> Self {
        Self { subscription_repo }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<ExpireSubscriptionsResult> {
        let expired_active = self.subscription_repo.expire_due_active(now).await?;
        let expired_trials = self.subscription_repo.expire_due_trials(now).await?;

        let result = ExpireSubscriptionsResult {
            expired_active,
            expired_trials,
        };

        info!(
            expired_active = result.expired_active,
            expired_trials = result.expired_trials,
            "check_subscriptions: completed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::subscriptions::MockSubscriptionRepository;
    use chrono::TimeZone;
    use mockall::Sequence;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn run_expires_due_active_and_trial_rows() {
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_expire_due_active()
            .with(eq(now))
            .times(1)
            .returning(|_| Ok(2));
        subscription_repo
            .expect_expire_due_trials()
            .with(eq(now))
            .times(1)
            .returning(|_| Ok(1));

        let result = ExpireSubscriptionsUseCase::new(Arc::new(subscription_repo))
            .run(now)
            .await
            .unwrap();

        assert_eq!(
            result,
            ExpireSubscriptionsResult {
                expired_active: 2,
                expired_trials: 1,
            }
        );
        assert_eq!(result.total(), 3);
    }

    #[tokio::test]
    async fn second_run_with_no_intervening_writes_is_a_no_op() {
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();

        let mut subscription_repo = MockSubscriptionRepository::new();
        let mut seq = Sequence::new();
        subscription_repo
            .expect_expire_due_active()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(3));
        subscription_repo
            .expect_expire_due_trials()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(1));
        subscription_repo
            .expect_expire_due_active()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(0));
        subscription_repo
            .expect_expire_due_trials()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(0));

        let usecase = ExpireSubscriptionsUseCase::new(Arc::new(subscription_repo));
        let first = usecase.run(now).await.unwrap();
        let second = usecase.run(now).await.unwrap();

        assert_eq!(first.total(), 4);
        assert_eq!(second.total(), 0);
    }

    mod sweep_scenarios {
        use super::*;
        use crate::domain::entities::subscriptions::{
            InsertSubscriptionEntity, SubscriptionEntity,
        };
        use crate::domain::value_objects::enums::{
            billing_cycles::BillingCycle, subscription_statuses::SubscriptionStatus,
        };
        use async_trait::async_trait;
        use chrono::Duration;
        use std::sync::Mutex;
        use uuid::Uuid;

        // In-memory stand-in honouring the store contract: expiry predicates
        // are strict less-than comparisons against the supplied instant.
        struct FakeSubscriptionStore {
            rows: Mutex<Vec<SubscriptionEntity>>,
        }

        impl FakeSubscriptionStore {
            fn with_rows(rows: Vec<SubscriptionEntity>) -> Self {
                Self {
                    rows: Mutex::new(rows),
                }
            }

            fn status_of(&self, id: i64) -> String {
                self.rows
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|row| row.id == id)
                    .map(|row| row.status.clone())
                    .unwrap()
            }
        }

        #[async_trait]
        impl SubscriptionRepository for FakeSubscriptionStore {
            async fn insert(
                &self,
                _insert_subscription_entity: InsertSubscriptionEntity,
            ) -> Result<SubscriptionEntity> {
                unreachable!("not exercised by the sweep")
            }

            async fn find_by_user_and_status(
                &self,
                _user_id: Uuid,
                _status: SubscriptionStatus,
            ) -> Result<Option<SubscriptionEntity>> {
                unreachable!("not exercised by the sweep")
            }

            async fn mark_active(
                &self,
                _subscription_id: i64,
                _billing_cycle: BillingCycle,
                _starts_at: DateTime<Utc>,
                _ends_at: DateTime<Utc>,
            ) -> Result<SubscriptionEntity> {
                unreachable!("not exercised by the sweep")
            }

            async fn mark_cancelled(
                &self,
                _subscription_id: i64,
                _cancelled_at: DateTime<Utc>,
            ) -> Result<SubscriptionEntity> {
                unreachable!("not exercised by the sweep")
            }

            async fn expire_due_active(&self, now: DateTime<Utc>) -> Result<usize> {
                let mut rows = self.rows.lock().unwrap();
                let mut count = 0;
                for row in rows.iter_mut() {
                    if row.status == "active" && row.ends_at.is_some_and(|ends| ends < now) {
                        row.status = "expired".to_string();
                        count += 1;
                    }
                }
                Ok(count)
            }

            async fn expire_due_trials(&self, now: DateTime<Utc>) -> Result<usize> {
                let mut rows = self.rows.lock().unwrap();
                let mut count = 0;
                for row in rows.iter_mut() {
                    if row.status == "trial" && row.trial_ends_at < now {
                        row.status = "expired".to_string();
                        count += 1;
                    }
                }
                Ok(count)
            }
        }

        fn trial_row(id: i64, trial_starts_at: DateTime<Utc>) -> SubscriptionEntity {
            SubscriptionEntity {
                id,
                user_id: Uuid::new_v4(),
                plan_id: 1,
                status: "trial".to_string(),
                billing_cycle: "monthly".to_string(),
                trial_starts_at,
                trial_ends_at: trial_starts_at + Duration::days(5),
                starts_at: None,
                ends_at: None,
                cancelled_at: None,
                created_at: trial_starts_at,
                updated_at: trial_starts_at,
            }
        }

        #[tokio::test]
        async fn trial_expires_only_after_its_window_has_lapsed() {
            let trial_starts_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let store = Arc::new(FakeSubscriptionStore::with_rows(vec![trial_row(
                1,
                trial_starts_at,
            )]));
            let usecase = ExpireSubscriptionsUseCase::new(store.clone());

            // 2024-01-05 is still inside the window ending 2024-01-06.
            let early = usecase
                .run(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
                .await
                .unwrap();
            assert_eq!(early.total(), 0);
            assert_eq!(store.status_of(1), "trial");

            let late = usecase
                .run(Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap())
                .await
                .unwrap();
            assert_eq!(late.expired_trials, 1);
            assert_eq!(store.status_of(1), "expired");

            // Re-running finds nothing left to expire.
            let again = usecase
                .run(Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap())
                .await
                .unwrap();
            assert_eq!(again.total(), 0);
        }
    }

    #[tokio::test]
    async fn store_failure_aborts_the_run() {
        let now = Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap();

        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_expire_due_active()
            .returning(|_| Err(anyhow::anyhow!("connection refused")));
        subscription_repo.expect_expire_due_trials().never();

        let result = ExpireSubscriptionsUseCase::new(Arc::new(subscription_repo))
            .run(now)
            .await;

        assert!(result.is_err());
    }
}
