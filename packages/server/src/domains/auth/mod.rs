//! Auth domain - authentication and authorization core
//!
//! Responsibilities:
//! - JWT issuance and verification (24h tokens, HS256)
//! - Password hashing (bcrypt)
//! - Role -> permission resolution, read fresh from Postgres per check
//! - Startup seeding of roles, permissions, and the optional default admin

pub mod errors;
pub mod jwt;
pub mod models;
pub mod password;
pub mod permissions;
pub mod seed;

pub use errors::AuthError;
pub use jwt::{Claims, Identity, JwtService};
pub use permissions::Permission;
