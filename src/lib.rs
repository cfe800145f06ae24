//! # gcodepath
//!
//! A position-tracking G-code toolpath writer:
//! - Linear, rapid and absolute moves with relative/absolute mode tracking
//! - Rectangle tracing and meander infill
//! - Configurable dialects (standard, GRBL, LinuxCNC)
//! - Header/footer bracketed output sessions
//!
//! ## Architecture
//!
//! gcodepath is organized as a workspace with multiple crates:
//!
//! 1. **gcodepath-core** - Axis, position store, motion engine, dialects, sinks, sessions
//! 2. **gcodepath-settings** - Configuration files
//! 3. **gcodepath** - Job files and the command-line binary

pub mod job;

pub use gcodepath_core::{
    Axis, CommandSink, Corner, Dialect, Direction, Error, MeanderParameters, MeanderSummary,
    MemorySink, MotionEngine, MotionError, MotionMode, MoveRequest, Orientation, PositionStore,
    Result, Session, SessionOptions, WriterSink,
};
pub use gcodepath_settings::{Config, OutputSettings, SettingsError};
pub use job::{Job, JobReport, Operation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Version string with build date
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout for G-code
/// - RUST_LOG environment variable support
/// - Pretty or JSON formatting
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // INFO only when RUST_LOG leaves the level unset
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}
