//! Storage layer for papi-daemon
//!
//! The models store holds policy types, policies, guard policies, and the
//! read-only PDP group view.

mod memory;
mod traits;

pub use memory::InMemoryPolicyStore;
pub use traits::{PolicyStore, StoreResult};
