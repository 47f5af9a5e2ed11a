//! # regis-core
//!
//! Core types, snapshot codec, and eligibility rules for regis.
//!
//! This crate provides the foundational types shared across all regis crates:
//! - Entity structs for students, modules, registrations, grades, and the
//!   operation log
//! - Operation and entity kind enums with stable symbolic names
//! - The snapshot codec used to persist and rebuild entity state
//! - The module-registration eligibility evaluator
//! - The acting principal threaded into every logging call
//! - Grade statistics
//! - Cross-cutting error types

pub mod eligibility;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod principal;
pub mod snapshot;
pub mod stats;
