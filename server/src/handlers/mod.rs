//! Request parsing and response shaping around the engine.

mod request;
mod response;

pub use request::*;
pub use response::*;
