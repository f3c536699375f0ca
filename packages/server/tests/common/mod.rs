pub mod fixtures;
pub mod harness;
pub mod requests;

pub use harness::*;
pub use requests::*;
