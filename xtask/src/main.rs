// Desktop/tooling crate: unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::use_debug)]

mod check;
mod regdump;
mod test;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Board driver development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the drivers for the embedded target and the host
    Check,
    /// Run all tests (unit, integration and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Decode a captured WL2866D register dump ("AA VV " records)
    Regdump {
        /// Dump file; reads stdin when omitted
        file: Option<std::path::PathBuf>,
        /// Also print each rail's enable bit and programmed voltage
        #[arg(long)]
        rails: bool,
    },
    /// Write WL2866D registers through the register-dump node
    Regwrite {
        /// Device node to write, or `-` to print the encoded records
        node: std::path::PathBuf,
        /// Register writes as `AA=VV` hex pairs
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

fn main() -> Result<()> {
    // RUST_LOG=debug shows the drivers' tracing output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Regdump { file, rails } => regdump::dump(file.as_deref(), rails),
        Commands::Regwrite { node, pairs } => regdump::write(&node, &pairs),
    }
}
