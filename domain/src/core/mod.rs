//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: language models used by the research nodes
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod string;
