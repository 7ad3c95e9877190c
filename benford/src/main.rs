//! Benford's Law audit tool.
//!
//! This binary loads a JSON record set, analyzes one numeric column for
//! conformity with Benford's Law and prints a text or JSON report.

use benford::{Cli, execute};
use benford_core::init_logging;
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.global.verbose, cli.global.quiet)?;

    // Errors are reported once, by anyhow on exit
    let rendered = execute(&cli).await?;
    println!("{rendered}");
    Ok(())
}
