//! HTTP API: export endpoints, bearer auth and CSV responses.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
