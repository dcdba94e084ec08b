use super::error::{SubscriptionError, SubscriptionResult};
use super::month::MonthValue;
use chrono::{DateTime, Utc};

/// A stored subscription. `end_month == None` means still active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: String,
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_month: MonthValue,
    pub end_month: Option<MonthValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a create or a full update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: String,
    pub start_month: MonthValue,
    pub end_month: Option<MonthValue>,
}

/// Inclusive month range an aggregation is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPeriod {
    start: MonthValue,
    end: MonthValue,
}

impl QueryPeriod {
    pub fn new(start: MonthValue, end: MonthValue) -> SubscriptionResult<Self> {
        if start.index() > end.index() {
            return Err(SubscriptionError::validation(
                "start_date",
                "must be before or equal to end_date",
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> MonthValue {
        self.start
    }

    pub fn end(&self) -> MonthValue {
        self.end
    }
}

/// Narrows the candidate fetch of an aggregation.
/// An empty `service_name` matches every service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub user_id: String,
    pub service_name: String,
}

impl FilterCriteria {
    pub fn service_name(&self) -> Option<&str> {
        (!self.service_name.is_empty()).then_some(self.service_name.as_str())
    }
}

/// Optional filters of the list operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}
