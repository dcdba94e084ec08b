//! Subscription domain: month values, validation, overlap cost calculation
//! and the service that ties them to a repository.

pub mod calculator;
pub mod error;
pub mod model;
pub mod month;
pub mod service;
pub mod validation;

pub use calculator::{billable_months, compute_total};
pub use error::{SubscriptionError, SubscriptionResult};
pub use model::{FilterCriteria, ListFilter, NewSubscription, QueryPeriod, Subscription};
pub use month::MonthValue;
pub use service::{SubscriptionRepository, SubscriptionService};
pub use validation::{
    ListQuery, SubscriptionRequest, TotalQuery, validate_list_query, validate_subscription,
    validate_total_query,
};
