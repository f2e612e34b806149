pub mod container;
pub mod user;

pub use container::{Container, ContainerType};
pub use user::{SanitizedUser, User, UserRole};
