//! REST API

pub mod handlers;
pub mod respond;
pub mod router;
pub mod state;
