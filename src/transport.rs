//! Transport adapters that submit manifest items to GitHub.
//!
//! - [`rest`]: issues and labels through the REST API, authenticated with a token
//! - [`gh`]: issues and labels through a pre-authenticated GitHub CLI session
//!
//! Every adapter implements [`crate::sync::Transport`], so the synchronizer
//! never needs to know which one it is driving.

pub mod gh;
pub mod rest;
