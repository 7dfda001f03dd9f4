//! Rinkside Store - flat JSON document store
//!
//! Backs the REST façade used by the team-management front-end
//! (news, surveys, players, cardio programs, ...). Collections are
//! arrays inside one JSON file; records are JSON objects with an `id`.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::{Filter, ID_FIELD, JsonStore};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_defined() {
        assert!(!version().is_empty());
    }
}
