pub mod admin;
pub mod auth;
pub mod documents;
pub mod health;

pub use admin::*;
pub use auth::*;
pub use documents::*;
pub use health::*;
