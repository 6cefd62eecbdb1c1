//! REST API request handlers

pub mod guard;
pub mod health;
pub mod policies;
pub mod policy_types;

pub use guard::*;
pub use health::*;
pub use policies::*;
pub use policy_types::*;
