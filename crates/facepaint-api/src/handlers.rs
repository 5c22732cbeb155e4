//! Request handlers.

pub mod health;
pub mod makeup;

pub use health::*;
pub use makeup::*;
