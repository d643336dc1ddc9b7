//! # askdb-service
//!
//! The request orchestrator for askdb. [`service::QueryService`] sequences
//! fetch schema → build prompt → obtain SQL → gate/execute → journal →
//! respond, and exposes the journal's stats/recent/errors accessors to
//! front-ends.
//!
//! Every public operation returns a typed result describing success or
//! failure; no fault propagates past a request boundary.

#![deny(unsafe_code)]

pub mod errors;
pub mod service;
pub mod types;

pub use errors::{Result, ServiceError};
pub use service::QueryService;
pub use types::{QueryRequest, QueryResponse};
