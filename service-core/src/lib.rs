//! service-core: Shared infrastructure for the container services.
pub mod config;
pub mod error;
pub mod observability;

