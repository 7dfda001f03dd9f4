//! Handlers HTTP.

pub mod collections;
pub mod health;
pub mod metrics;
pub mod response;
pub mod translate;
