//! # askdb-core
//!
//! Foundation types for the askdb query system.
//!
//! This crate provides the shared vocabulary the other askdb crates depend on:
//!
//! - **Branded IDs**: [`ids::SessionId`] as a newtype for type safety
//! - **Results**: [`result::StatementResult`], [`result::BatchResult`], and
//!   [`result::QueryOutcome`] modeling gate and execution outcomes
//! - **Policy**: [`policy::SensitivePolicy`], the identifier deny list
//!   consulted by the statement gate
//! - **Text utilities**: [`text::strip_code_fences`] for model output cleanup
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other askdb crates.

#![deny(unsafe_code)]

pub mod ids;
pub mod policy;
pub mod result;
pub mod text;
