// HTTP middleware - the authenticate -> authorize -> own pipeline
pub mod authorize;
pub mod ownership;

pub use authorize::*;
pub use ownership::*;
