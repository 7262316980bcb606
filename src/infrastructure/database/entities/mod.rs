//! Database entities module

pub mod truck;
pub mod user;
pub mod warehouse;

pub use truck::Entity as Truck;
pub use user::Entity as User;
pub use warehouse::Entity as Warehouse;
