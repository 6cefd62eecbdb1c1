//! Legacy guard policy records
//!
//! Guard policies predate the TOSCA model. They are identified by
//! `(policy_id, policy_version)` where the version is a bare integer string,
//! and their policy type is implied by the id prefix rather than carried in
//! the record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Client-supplied guard policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyGuardPolicyInput {
    #[serde(rename = "policy-id")]
    pub policy_id: String,
    #[serde(rename = "policy-version", skip_serializing_if = "Option::is_none")]
    pub policy_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

/// Stored form of a guard policy, as returned by the models provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyGuardPolicyOutput {
    #[serde(rename = "type")]
    pub policy_type: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Guard policy responses are keyed by policy id
pub type GuardPolicyMap = BTreeMap<String, LegacyGuardPolicyOutput>;
