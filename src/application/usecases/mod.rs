pub mod expire_subscriptions;
pub mod subscriptions;
