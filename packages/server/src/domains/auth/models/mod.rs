pub mod role;
pub mod user;

pub use role::Role;
pub use user::{User, UserWithRole};
