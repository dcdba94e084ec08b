use crate::{
    config::Config,
    server::Server,
    subscription::{
        FilterCriteria, ListFilter, NewSubscription, QueryPeriod, Subscription,
        SubscriptionError, SubscriptionRepository, SubscriptionResult,
    },
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Test server builder backed by an in-memory SQLite database
pub struct TestServerBuilder {
    config: Config,
}

impl TestServerBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the server and run migrations
    pub async fn build(self) -> Server {
        let mut config = self.config;

        config.database.url = Some("sqlite::memory:".to_string());
        config.logging.log_request = false;

        let server = Server::new(config).await.unwrap();
        server.database.migrate().await.unwrap();
        server
    }
}

impl Default for TestServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Repository fake keeping rows in a vector.
///
/// Filters like the database implementation unless built with
/// [`returning_everything`](Self::returning_everything), in which case
/// `fetch_for_period` hands back every row of the store.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    rows: Mutex<Vec<Subscription>>,
    next_id: AtomicUsize,
    fetch_calls: AtomicUsize,
    failure: Mutex<Option<String>>,
    over_return: bool,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning_everything(mut self) -> Self {
        self.over_return = true;
        self
    }

    /// Make every following call fail with a repository error
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    /// Number of `fetch_for_period` calls seen so far
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> SubscriptionResult<()> {
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(SubscriptionError::Repository(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn fetch_for_period(
        &self,
        filter: &FilterCriteria,
        period: &QueryPeriod,
    ) -> SubscriptionResult<Vec<Subscription>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;

        let rows = self.rows.lock().unwrap();
        if self.over_return {
            return Ok(rows.clone());
        }

        Ok(rows
            .iter()
            .filter(|s| s.user_id == filter.user_id)
            .filter(|s| filter.service_name().is_none_or(|name| s.service_name == name))
            .filter(|s| s.start_month <= period.end())
            .filter(|s| s.end_month.is_none_or(|end| end >= period.start()))
            .cloned()
            .collect())
    }

    async fn fetch_by_id(&self, id: &str) -> SubscriptionResult<Option<Subscription>> {
        self.check_failure()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|s| s.id == id).cloned())
    }

    async fn list(&self, filter: &ListFilter) -> SubscriptionResult<Vec<Subscription>> {
        self.check_failure()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|s| filter.user_id.as_ref().is_none_or(|u| &s.user_id == u))
            .filter(|s| {
                filter
                    .service_name
                    .as_ref()
                    .is_none_or(|name| &s.service_name == name)
            })
            .cloned()
            .collect())
    }

    async fn create(&self, input: &NewSubscription) -> SubscriptionResult<Subscription> {
        self.check_failure()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let subscription = Subscription {
            id: format!("sub-{}", id),
            service_name: input.service_name.clone(),
            price: input.price,
            user_id: input.user_id.clone(),
            start_month: input.start_month,
            end_month: input.end_month,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(subscription.clone());
        Ok(subscription)
    }

    async fn update(
        &self,
        id: &str,
        input: &NewSubscription,
    ) -> SubscriptionResult<Option<Subscription>> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        row.service_name = input.service_name.clone();
        row.price = input.price;
        row.user_id = input.user_id.clone();
        row.start_month = input.start_month;
        row.end_month = input.end_month;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str) -> SubscriptionResult<bool> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|s| s.id != id);
        Ok(rows.len() < before)
    }
}
