//! Main binary entry point for the PHPUnit annotation migrator.
//!
//! This binary delegates to the shared `entry_point::run_with_args()` function so the
//! standalone `migrate` binary behaves the same way.

use anyhow::Result;

fn main() -> Result<()> {
    let code = phpunit_migrator::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
