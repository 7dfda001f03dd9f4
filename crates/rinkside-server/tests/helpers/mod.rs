//! Test helpers para rinkside-server.

#![allow(dead_code, unused_imports)]

pub mod app;
pub mod client;

pub use app::{MockTranslator, TestApp};
pub use client::{TestClient, TestResponse, client};
