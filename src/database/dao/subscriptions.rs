use crate::database::entities::{SubscriptionRecord, subscriptions};
use crate::database::{DatabaseError, DatabaseResult};
use crate::subscription::{
    FilterCriteria, ListFilter, MonthValue, NewSubscription, QueryPeriod, Subscription,
    SubscriptionRepository, SubscriptionResult,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

/// Subscriptions DAO for database operations
#[derive(Clone)]
pub struct SubscriptionsDao {
    db: DatabaseConnection,
}

impl SubscriptionsDao {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new subscription with a generated id
    pub async fn create(&self, input: &NewSubscription) -> DatabaseResult<SubscriptionRecord> {
        let now = Utc::now();
        let active_model = subscriptions::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            service_name: Set(input.service_name.clone()),
            price: Set(input.price),
            user_id: Set(input.user_id.clone()),
            start_date: Set(input.start_month.first_day()),
            end_date: Set(input.end_month.map(|m| m.first_day())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active_model
            .insert(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Get subscription by id
    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<SubscriptionRecord>> {
        subscriptions::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// List subscriptions, newest first
    pub async fn list(&self, filter: &ListFilter) -> DatabaseResult<Vec<SubscriptionRecord>> {
        let mut select = subscriptions::Entity::find();

        if let Some(ref user_id) = filter.user_id {
            select = select.filter(subscriptions::Column::UserId.eq(user_id));
        }
        if let Some(ref service_name) = filter.service_name {
            select = select.filter(subscriptions::Column::ServiceName.eq(service_name));
        }

        select
            .order_by_desc(subscriptions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Subscriptions of `user_id` whose billing window touches
    /// `[period_start, period_end]`
    pub async fn find_for_period(
        &self,
        user_id: &str,
        service_name: Option<&str>,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> DatabaseResult<Vec<SubscriptionRecord>> {
        let mut select = subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(user_id))
            .filter(subscriptions::Column::StartDate.lte(period_end))
            .filter(
                Condition::any()
                    .add(subscriptions::Column::EndDate.is_null())
                    .add(subscriptions::Column::EndDate.gte(period_start)),
            );

        if let Some(service_name) = service_name {
            select = select.filter(subscriptions::Column::ServiceName.eq(service_name));
        }

        select
            .all(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))
    }

    /// Replace all mutable fields and bump `updated_at`
    pub async fn update(
        &self,
        id: &str,
        input: &NewSubscription,
    ) -> DatabaseResult<Option<SubscriptionRecord>> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active_model = subscriptions::ActiveModel::from(existing);
        active_model.service_name = Set(input.service_name.clone());
        active_model.price = Set(input.price);
        active_model.user_id = Set(input.user_id.clone());
        active_model.start_date = Set(input.start_month.first_day());
        active_model.end_date = Set(input.end_month.map(|m| m.first_day()));
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(Some(updated))
    }

    /// Delete subscription; `false` when nothing matched
    pub async fn delete(&self, id: &str) -> DatabaseResult<bool> {
        let result = subscriptions::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(|e| DatabaseError::Database(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

impl From<SubscriptionRecord> for Subscription {
    fn from(record: SubscriptionRecord) -> Self {
        Self {
            id: record.id,
            service_name: record.service_name,
            price: record.price,
            user_id: record.user_id,
            start_month: MonthValue::from_date(record.start_date),
            end_month: record.end_date.map(MonthValue::from_date),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionsDao {
    async fn fetch_for_period(
        &self,
        filter: &FilterCriteria,
        period: &QueryPeriod,
    ) -> SubscriptionResult<Vec<Subscription>> {
        let records = self
            .find_for_period(
                &filter.user_id,
                filter.service_name(),
                period.start().first_day(),
                period.end().first_day(),
            )
            .await?;
        Ok(records.into_iter().map(Subscription::from).collect())
    }

    async fn fetch_by_id(&self, id: &str) -> SubscriptionResult<Option<Subscription>> {
        Ok(self.find_by_id(id).await?.map(Subscription::from))
    }

    async fn list(&self, filter: &ListFilter) -> SubscriptionResult<Vec<Subscription>> {
        let records = SubscriptionsDao::list(self, filter).await?;
        Ok(records.into_iter().map(Subscription::from).collect())
    }

    async fn create(&self, input: &NewSubscription) -> SubscriptionResult<Subscription> {
        Ok(SubscriptionsDao::create(self, input).await?.into())
    }

    async fn update(
        &self,
        id: &str,
        input: &NewSubscription,
    ) -> SubscriptionResult<Option<Subscription>> {
        Ok(SubscriptionsDao::update(self, id, input)
            .await?
            .map(Subscription::from))
    }

    async fn delete(&self, id: &str) -> SubscriptionResult<bool> {
        Ok(SubscriptionsDao::delete(self, id).await?)
    }
}
