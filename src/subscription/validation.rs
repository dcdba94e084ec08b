//! Conversion of raw client input into the typed values the core works with.
//!
//! Every rejection is a [`SubscriptionError::Validation`] naming the field at
//! fault, so the HTTP layer can answer with a client error as is.

use super::error::{SubscriptionError, SubscriptionResult};
use super::model::{FilterCriteria, ListFilter, NewSubscription, QueryPeriod};
use super::month::MonthValue;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of a create or update request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionRequest {
    /// Name of the subscribed service (e.g. "Yandex Plus")
    #[serde(default)]
    pub service_name: String,
    /// Monthly price in whole currency units
    #[serde(default)]
    pub price: i64,
    /// Owner of the subscription
    #[serde(default)]
    pub user_id: String,
    /// First billed month, `MM-YYYY`
    #[serde(default)]
    pub start_date: String,
    /// Last billed month, `MM-YYYY`; null or blank for an open-ended subscription
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Query string of the total endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TotalQuery {
    /// Owner whose subscriptions are summed (required)
    pub user_id: Option<String>,
    /// Restrict to one service; blank means any
    pub service_name: Option<String>,
    /// First month of the period, `MM-YYYY` (required)
    pub start_date: Option<String>,
    /// Last month of the period, `MM-YYYY` (required)
    pub end_date: Option<String>,
}

/// Query string of the list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

/// Largest accepted monthly price
pub const MAX_PRICE: i64 = 1_000_000_000;

fn required_text(field: &'static str, value: &str) -> SubscriptionResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SubscriptionError::validation(field, "is required"));
    }
    Ok(value.to_string())
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn month_field(field: &'static str, value: &str) -> SubscriptionResult<MonthValue> {
    MonthValue::parse(value).map_err(|_| SubscriptionError::validation(field, "must be MM-YYYY"))
}

/// Validate a create/update body.
///
/// An end month earlier than the start month is rejected here instead of
/// being stored and silently billed as zero.
pub fn validate_subscription(raw: &SubscriptionRequest) -> SubscriptionResult<NewSubscription> {
    let service_name = required_text("service_name", &raw.service_name)?;
    let user_id = required_text("user_id", &raw.user_id)?;

    if raw.price < 0 {
        return Err(SubscriptionError::validation("price", "must be >= 0"));
    }
    if raw.price > MAX_PRICE {
        return Err(SubscriptionError::validation(
            "price",
            format!("must be <= {}", MAX_PRICE),
        ));
    }

    if raw.start_date.trim().is_empty() {
        return Err(SubscriptionError::validation("start_date", "is required"));
    }
    let start_month = month_field("start_date", &raw.start_date)?;

    let end_month = match optional_text(raw.end_date.as_deref()) {
        Some(text) => Some(
            MonthValue::parse(&text).map_err(|_| {
                SubscriptionError::validation("end_date", "must be MM-YYYY or null")
            })?,
        ),
        None => None,
    };

    if let Some(end) = end_month {
        if end.index() < start_month.index() {
            return Err(SubscriptionError::validation(
                "end_date",
                "must not be before start_date",
            ));
        }
    }

    Ok(NewSubscription {
        service_name,
        price: raw.price,
        user_id,
        start_month,
        end_month,
    })
}

/// Validate the query of a total request into filter and period.
pub fn validate_total_query(raw: &TotalQuery) -> SubscriptionResult<(FilterCriteria, QueryPeriod)> {
    let user_id = required_text("user_id", raw.user_id.as_deref().unwrap_or_default())?;
    let service_name = optional_text(raw.service_name.as_deref()).unwrap_or_default();

    let start = optional_text(raw.start_date.as_deref())
        .ok_or_else(|| SubscriptionError::validation("start_date", "is required"))?;
    let end = optional_text(raw.end_date.as_deref())
        .ok_or_else(|| SubscriptionError::validation("end_date", "is required"))?;

    let period = QueryPeriod::new(month_field("start_date", &start)?, month_field("end_date", &end)?)?;

    Ok((
        FilterCriteria {
            user_id,
            service_name,
        },
        period,
    ))
}

/// Trim list filters; blank values mean "no filter".
pub fn validate_list_query(raw: &ListQuery) -> ListFilter {
    ListFilter {
        user_id: optional_text(raw.user_id.as_deref()),
        service_name: optional_text(raw.service_name.as_deref()),
    }
}

/// Trim a path identifier and reject a blank one.
pub fn validate_id(id: &str) -> SubscriptionResult<String> {
    required_text("id", id)
}
