//! Extractores propios del servidor.

pub mod json;

pub use json::AppJson;
