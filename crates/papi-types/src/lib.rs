//! Policy API Types - Data model for the Policy Design API
//!
//! The Policy Design API manages TOSCA-shaped policy types and the policies
//! that instantiate them. This crate holds the transit structures and
//! identifier types shared between the daemon and its storage layer.
//!
//! ## Key Concepts
//!
//! - **ToscaPolicyType**: a schema describing a family of policies
//! - **ToscaPolicy**: an instance parameterizing exactly one policy type version
//! - **ToscaServiceTemplate**: the wire container holding either of the above
//! - **PdpGroup**: a deployment target group, read only to enforce delete rules
//! - **Legacy guard policies**: bare-integer versioned policies whose id prefix
//!   selects their policy type

#![deny(unsafe_code)]

pub mod guard;
pub mod key;
pub mod pdp;
pub mod template;
pub mod version;

// Re-export main types
pub use guard::{GuardPolicyMap, LegacyGuardPolicyInput, LegacyGuardPolicyOutput};
pub use key::{ConceptKey, KeyError, ToscaPolicyIdentifier};
pub use pdp::{PdpGroup, PdpGroupFilter};
pub use template::{
    ToscaPolicy, ToscaPolicyType, ToscaServiceTemplate, ToscaTopologyTemplate,
};
pub use version::{PolicyVersion, VersionError, INVALID_LEGACY_VERSION};
