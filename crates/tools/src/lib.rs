//! Arbiter Tools
//!
//! Logging setup, world fixtures and the headless replay driver behind the
//! `check` and `run` binaries.

pub mod fixture;
pub mod replay;

pub use fixture::{
    FixtureError, FixtureMetadata, FixtureResult, Keyframe, ObjectFixture, WorldFixture,
};
pub use replay::{ReplayError, ReplayReport, replay};

use tracing_subscriber::{EnvFilter, fmt};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Default is `debug` for arbiter crates and `info` for others.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,arbiter_tools=debug,arbiter_runtime=debug,arbiter_dsl=debug")
    });

    fmt().with_env_filter(filter).with_target(false).init();
}
