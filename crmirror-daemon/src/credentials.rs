//! Control-plane credential resolution.
//!
//! Runs once before the core starts. In-cluster mode reads the
//! service-account mount the platform provides; external mode takes an
//! explicit URL, token, and CA bundle.

use std::fs;
use std::path::Path;

use crate::cli::Cli;
use crmirror_client::ClientConfig;
use crmirror_types::ConfigError;

const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

pub fn resolve(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    if cli.in_cluster {
        in_cluster_config(
            std::env::var("KUBERNETES_SERVICE_HOST").ok(),
            std::env::var("KUBERNETES_SERVICE_PORT").ok(),
            Path::new(SERVICE_ACCOUNT_DIR),
            cli.request_timeout_secs,
        )
    } else {
        external_config(
            cli.apiserver_url.clone(),
            cli.apiserver_token.clone(),
            cli.apiserver_ca_path.as_deref(),
            cli.apiserver_insecure,
            cli.request_timeout_secs,
        )
    }
}

fn in_cluster_config(
    service_host: Option<String>,
    service_port: Option<String>,
    mount: &Path,
    timeout_secs: u64,
) -> Result<ClientConfig, ConfigError> {
    let host = service_host.filter(|h| !h.is_empty()).ok_or_else(|| {
        ConfigError::Credentials {
            message: "KUBERNETES_SERVICE_HOST is not set (not running in a cluster?)".to_string(),
        }
    })?;
    let port = service_port.filter(|p| !p.is_empty()).unwrap_or_else(|| "443".to_string());

    let token = fs::read_to_string(mount.join("token"))
        .map_err(|e| ConfigError::Credentials {
            message: format!("cannot read service-account token: {}", e),
        })?
        .trim()
        .to_string();
    let ca_bundle_pem = fs::read(mount.join("ca.crt")).map_err(|e| ConfigError::Credentials {
        message: format!("cannot read service-account CA bundle: {}", e),
    })?;

    Ok(ClientConfig {
        base_url: format!("https://{}:{}", host, port),
        bearer_token: Some(token),
        ca_bundle_pem: Some(ca_bundle_pem),
        accept_invalid_certs: false,
        timeout_secs,
    })
}

fn external_config(
    url: Option<String>,
    token: Option<String>,
    ca_path: Option<&Path>,
    insecure: bool,
    timeout_secs: u64,
) -> Result<ClientConfig, ConfigError> {
    let base_url = url.filter(|u| !u.is_empty()).ok_or_else(|| ConfigError::Credentials {
        message: "APISERVER_URL is required when IN_CLUSTER=false".to_string(),
    })?;

    let ca_bundle_pem = match ca_path {
        Some(path) => Some(fs::read(path).map_err(|e| ConfigError::Credentials {
            message: format!("cannot read CA bundle {}: {}", path.display(), e),
        })?),
        None => None,
    };

    Ok(ClientConfig {
        base_url,
        bearer_token: token,
        ca_bundle_pem,
        accept_invalid_certs: insecure,
        timeout_secs,
    })
}
