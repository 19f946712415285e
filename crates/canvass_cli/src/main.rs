//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `canvass_core` linkage.
//! - Bootstrap process logging the way a real deployment would.
//! - Keep output deterministic for quick local sanity checks.

use canvass_core::{core_version, default_log_level, init_logging, ping};

fn main() {
    // Why: keep a tiny CLI probe to validate core crate wiring independently
    // from the HTTP deployment setup.
    let log_dir = std::env::temp_dir().join("canvass-logs");
    match init_logging(default_log_level(), &log_dir.to_string_lossy()) {
        Ok(()) => println!("canvass_core logging at {}", log_dir.display()),
        Err(err) => eprintln!("canvass_core logging init failed: {err}"),
    }

    println!("canvass_core ping={}", ping());
    println!("canvass_core version={}", core_version());
}
