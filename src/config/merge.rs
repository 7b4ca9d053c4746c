//! Merge rules for the layered configuration store.

pub mod merge_policy;
