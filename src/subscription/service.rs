use super::calculator::compute_total;
use super::error::{SubscriptionError, SubscriptionResult};
use super::model::{FilterCriteria, ListFilter, NewSubscription, QueryPeriod, Subscription};
use super::validation::validate_id;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Storage collaborator of the subscription service.
///
/// `fetch_for_period` may return rows that do not overlap the period; the
/// calculator ignores them.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn fetch_for_period(
        &self,
        filter: &FilterCriteria,
        period: &QueryPeriod,
    ) -> SubscriptionResult<Vec<Subscription>>;

    async fn fetch_by_id(&self, id: &str) -> SubscriptionResult<Option<Subscription>>;

    /// Newest first
    async fn list(&self, filter: &ListFilter) -> SubscriptionResult<Vec<Subscription>>;

    async fn create(&self, input: &NewSubscription) -> SubscriptionResult<Subscription>;

    /// Replace all mutable fields; `None` when no row has this id
    async fn update(
        &self,
        id: &str,
        input: &NewSubscription,
    ) -> SubscriptionResult<Option<Subscription>>;

    /// `false` when no row has this id
    async fn delete(&self, id: &str) -> SubscriptionResult<bool>;
}

/// Subscription operations and spend aggregation over an injected repository
#[derive(Clone)]
pub struct SubscriptionService {
    repository: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(repository: Arc<dyn SubscriptionRepository>) -> Self {
        Self { repository }
    }

    /// Total spend of the filtered subscriptions over `period`.
    ///
    /// Fails before touching the repository when `user_id` is blank, and
    /// returns no partial result when the repository fails.
    pub async fn total(
        &self,
        filter: &FilterCriteria,
        period: &QueryPeriod,
    ) -> SubscriptionResult<i64> {
        if filter.user_id.trim().is_empty() {
            return Err(SubscriptionError::validation("user_id", "is required"));
        }

        let candidates = self.repository.fetch_for_period(filter, period).await?;
        let total = compute_total(&candidates, period)?;

        debug!(
            user_id = %filter.user_id,
            service_name = %filter.service_name,
            period_start = %period.start(),
            period_end = %period.end(),
            candidates = candidates.len(),
            total,
            "Computed subscription total"
        );

        Ok(total)
    }

    pub async fn create(&self, input: &NewSubscription) -> SubscriptionResult<Subscription> {
        let created = self.repository.create(input).await?;
        info!(
            id = %created.id,
            user_id = %created.user_id,
            service_name = %created.service_name,
            "Subscription created"
        );
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> SubscriptionResult<Subscription> {
        let id = validate_id(id)?;
        self.repository
            .fetch_by_id(&id)
            .await?
            .ok_or(SubscriptionError::NotFound(id))
    }

    pub async fn list(&self, filter: &ListFilter) -> SubscriptionResult<Vec<Subscription>> {
        self.repository.list(filter).await
    }

    pub async fn update(
        &self,
        id: &str,
        input: &NewSubscription,
    ) -> SubscriptionResult<Subscription> {
        let id = validate_id(id)?;
        let updated = self
            .repository
            .update(&id, input)
            .await?
            .ok_or_else(|| SubscriptionError::NotFound(id.clone()))?;
        info!(id = %id, "Subscription updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> SubscriptionResult<()> {
        let id = validate_id(id)?;
        if !self.repository.delete(&id).await? {
            return Err(SubscriptionError::NotFound(id));
        }
        info!(id = %id, "Subscription deleted");
        Ok(())
    }
}
