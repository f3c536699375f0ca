// Archiv System - API Core
//
// This crate provides the backend API for the document archive: users
// authenticate with username/password and receive a JWT; documents are
// managed behind per-route permission checks (resolved fresh from the
// database) and per-document ownership checks.

pub mod common;
pub mod config;
pub mod domains;
pub mod server;

pub use config::*;
