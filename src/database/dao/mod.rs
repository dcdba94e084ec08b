pub mod subscriptions;

pub use subscriptions::SubscriptionsDao;
