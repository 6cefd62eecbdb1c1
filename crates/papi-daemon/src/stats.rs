//! Invocation statistics
//!
//! Counters behind relaxed atomics; a router layer counts every API call
//! and its outcome, the resource handlers bump their own counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared invocation counters
#[derive(Debug, Default)]
pub struct ApiStatistics {
    total_api_calls: AtomicU64,
    successful_api_calls: AtomicU64,
    failed_api_calls: AtomicU64,
    policy_type_gets: AtomicU64,
    policy_type_posts: AtomicU64,
    policy_type_deletes: AtomicU64,
    policy_gets: AtomicU64,
    policy_posts: AtomicU64,
    policy_deletes: AtomicU64,
}

impl ApiStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one API call and its outcome
    pub fn record_api_call(&self, success: bool) {
        self.total_api_calls.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_api_calls.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_api_calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_policy_type_get(&self) {
        self.policy_type_gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_policy_type_post(&self) {
        self.policy_type_posts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_policy_type_delete(&self) {
        self.policy_type_deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_policy_get(&self) {
        self.policy_gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_policy_post(&self) {
        self.policy_posts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_policy_delete(&self) {
        self.policy_deletes.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters into a report
    pub fn report(&self) -> StatisticsReport {
        StatisticsReport {
            code: 200,
            total_api_call_count: self.total_api_calls.load(Ordering::Relaxed),
            api_call_success_count: self.successful_api_calls.load(Ordering::Relaxed),
            api_call_failure_count: self.failed_api_calls.load(Ordering::Relaxed),
            total_policy_type_get_count: self.policy_type_gets.load(Ordering::Relaxed),
            total_policy_type_post_count: self.policy_type_posts.load(Ordering::Relaxed),
            total_policy_type_delete_count: self.policy_type_deletes.load(Ordering::Relaxed),
            total_policy_get_count: self.policy_gets.load(Ordering::Relaxed),
            total_policy_post_count: self.policy_posts.load(Ordering::Relaxed),
            total_policy_delete_count: self.policy_deletes.load(Ordering::Relaxed),
        }
    }
}

/// Statistics report returned by `/statistics`
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub code: u16,
    pub total_api_call_count: u64,
    pub api_call_success_count: u64,
    pub api_call_failure_count: u64,
    pub total_policy_type_get_count: u64,
    pub total_policy_type_post_count: u64,
    pub total_policy_type_delete_count: u64,
    pub total_policy_get_count: u64,
    pub total_policy_post_count: u64,
    pub total_policy_delete_count: u64,
}
