//! Subcommand implementations, each as methods on [`crate::App`].

mod issues;
mod labels;
