//! Services layer for container-service.
//!
//! Identity store, session holder, authorization policy and container store.

mod auth;
pub mod bootstrap;
mod container;
pub mod database;
pub mod error;
pub mod policy;
pub mod session;

pub use auth::AuthService;
pub use bootstrap::{bootstrap_demo_data, BootstrapOutcome};
pub use container::ContainerService;
pub use database::{
    ContainerPatch, ContainerRepository, InMemoryContainerRepository, InMemoryUserRepository,
    UserRepository,
};
pub use error::ServiceError;
pub use policy::{AccessPolicy, PolicyError};
pub use session::{
    FileSessionStorage, InMemorySessionStorage, SessionHolder, SessionStorage, SESSION_KEY,
};
