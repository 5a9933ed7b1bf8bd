mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod labels;
pub mod manifest;
pub mod ops;
pub mod pacing;
pub mod sync;
pub mod transport;

pub use app::App;
pub use config::Config;

// Disable colors for all tests to get clean output
#[cfg(test)]
#[ctor::ctor]
fn init_tests() {
    colored::control::set_override(false);
}
