//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides the
//! [`ResourceClient`] collaborator the controller talks to.

mod client;

pub use client::*;

use std::path::Path;

use anyhow::{Context, Result};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

/// Initialize a Kubernetes client
///
/// With no explicit kubeconfig path, uses the default loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn create_client(kubeconfig: Option<&Path>) -> Result<Client> {
    let config = match kubeconfig {
        Some(path) => {
            let kc = Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig: {}", path.display()))?;
            Config::from_custom_kubeconfig(kc, &KubeConfigOptions::default())
                .await
                .with_context(|| format!("Invalid kubeconfig: {}", path.display()))?
        }
        None => Config::infer()
            .await
            .context("Failed to infer cluster configuration")?,
    };

    let client = Client::try_from(config).context("Failed to build Kubernetes client")?;
    Ok(client)
}

/// Get the current context name for the header line
///
/// Best-effort: falls back to "default" when the kubeconfig has no
/// current-context set.
pub fn get_context(kubeconfig: Option<&Path>) -> String {
    let parsed = match kubeconfig {
        Some(path) => Kubeconfig::read_from(path).ok(),
        None => Kubeconfig::read().ok(),
    };
    parsed
        .and_then(|kc| kc.current_context)
        .unwrap_or_else(|| "default".to_string())
}
