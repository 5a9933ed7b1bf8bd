//! Process-backed operations that reach GitHub.
//!
//! - [`http`]: JSON requests to the REST API, sent through curl
//! - [`gh`]: issue and label commands run through the GitHub CLI
//!
//! Each submodule exposes a trait with a real implementation and, under test,
//! a mockall mock.

pub mod gh;
pub mod http;
