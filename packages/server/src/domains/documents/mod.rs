//! Documents domain - archive entries and their ownership facts
//!
//! A document has exactly one owner, fixed at creation time; there is no
//! transfer operation. Upload and update are CRUD glue around the auth
//! core: file persistence, tag bookkeeping, and row updates.

pub mod data;
pub mod errors;
pub mod models;
pub mod ownership;
pub mod service;
pub mod storage;

pub use data::DocumentData;
pub use errors::DocumentError;
pub use models::{Document, Tag};
pub use storage::FileStore;
