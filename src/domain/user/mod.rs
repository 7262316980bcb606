//! User aggregate

pub mod model;
pub mod repository;

pub use model::{User, UserRole, UserStatus};
pub use repository::UserRepository;
