//! Command-line interface

mod logging;

pub use logging::init_logging;

use std::path::PathBuf;

use clap::Parser;

/// pod9s - A K9s-inspired terminal UI for browsing pods and following their logs
#[derive(Parser, Debug)]
#[command(name = "pod9s")]
#[command(about = "Browse namespaces and pods, inspect metadata, events and live logs", long_about = None)]
pub struct Args {
    /// Path to the kubeconfig file (defaults to the standard loading chain)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Enable debug logging to a temporary file
    #[arg(long, short = 'd')]
    pub debug: bool,
}
