//! Policy API daemon library
//!
//! This module provides the core components for the policy API daemon:
//! - REST API handlers for TOSCA policy types and policies
//! - Legacy guard policy adapter
//! - Storage backends
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod service;
pub mod stats;
pub mod storage;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, StorageError};
pub use server::Server;
pub use storage::{InMemoryPolicyStore, PolicyStore};
