use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use pod9s::cli::{init_logging, Args};
use pod9s::KubeResourceClient;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_file = init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    tracing::debug!("Initializing Kubernetes client");
    let client = pod9s::kube::create_client(args.kubeconfig.as_deref())
        .await
        .context("Failed to connect to the cluster")?;
    let context = pod9s::kube::get_context(args.kubeconfig.as_deref());
    tracing::info!("Connected to Kubernetes context: {}", context);

    let resources = Arc::new(KubeResourceClient::new(client));
    pod9s::tui::run_tui(resources, context).await?;

    Ok(())
}
