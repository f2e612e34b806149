pub mod auth;
pub mod container;
