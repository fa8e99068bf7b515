//! Library crate for duum-back, exposing modules for binaries and integration tests.

pub mod config;
/// Persistence layer: entities, storage errors and backends.
pub mod dao;
/// Request and response payloads of the HTTP API.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum route trees.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state.
pub mod state;
