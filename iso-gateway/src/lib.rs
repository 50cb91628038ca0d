pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod query;
pub mod reconcile;
pub mod store;
pub mod timefmt;
pub mod transform;
pub mod upstream;

#[cfg(test)]
pub mod testing;

pub use error::GatewayError;
pub use reconcile::{ReconcileOutcome, Reconciler};
