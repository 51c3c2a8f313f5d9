use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crmirror_core::{ConflictPolicy, SyncPolicy};
use crmirror_types::{ConfigError, GlobalCoordinates};

#[derive(Parser, Debug)]
#[command(
    name = "crmirror",
    about = "crmirror - headless file/custom-resource sync daemon",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    /// Mapping lines of the form `path=plural:name`, newline-separated
    #[arg(long, env = "FILE_MAP")]
    pub file_map: String,

    #[arg(long, env = "CRD_GROUP", default_value = "ha.example.com")]
    pub crd_group: String,

    #[arg(long, env = "CRD_VERSION", default_value = "v1")]
    pub crd_version: String,

    /// Namespace; falls back to $NAMESPACE, then "default"
    #[arg(long, env = "CRD_NAMESPACE")]
    pub crd_namespace: Option<String>,

    /// Object kind sent in write bodies
    #[arg(long, env = "CRD_KIND", default_value = "Data")]
    pub crd_kind: String,

    /// Polling interval in seconds (fractional allowed, must be positive)
    #[arg(long, env = "SYNC_INTERVAL", default_value_t = 5.0, allow_hyphen_values = true)]
    pub sync_interval: f64,

    /// Resolve credentials from the in-cluster service-account mount
    #[arg(long, env = "IN_CLUSTER", default_value_t = true, action = ArgAction::Set)]
    pub in_cluster: bool,

    /// API server URL when running outside the cluster
    #[arg(long, env = "APISERVER_URL")]
    pub apiserver_url: Option<String>,

    /// Bearer token when running outside the cluster
    #[arg(long, env = "APISERVER_TOKEN")]
    pub apiserver_token: Option<String>,

    /// PEM bundle to trust for the API server's certificate
    #[arg(long, env = "APISERVER_CA_PATH")]
    pub apiserver_ca_path: Option<PathBuf>,

    /// Disable TLS verification (development setups only)
    #[arg(long, env = "APISERVER_INSECURE", default_value_t = false, action = ArgAction::Set)]
    pub apiserver_insecure: bool,

    /// Which side wins when file and resource changed between ticks
    #[arg(long, env = "CONFLICT_POLICY", value_enum, default_value = "file")]
    pub conflict_policy: ConflictPolicyArg,

    /// Never overwrite a local file from an absent resource
    #[arg(long, env = "PROTECT_LOCAL_ON_CR_ABSENT", default_value_t = true, action = ArgAction::Set)]
    pub protect_local_on_cr_absent: bool,

    /// Skip mirroring an empty `{}` resource payload to the file
    #[arg(long, env = "SKIP_EMPTY_CR_TO_FILE", default_value_t = true, action = ArgAction::Set)]
    pub skip_empty_cr_to_file: bool,

    /// Per-request deadline in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicyArg {
    /// The co-located file-writing application is authoritative
    File,
    /// Cluster-side edits win over local ones
    Resource,
}

impl Cli {
    pub fn coordinates(&self) -> GlobalCoordinates {
        let namespace = self
            .crd_namespace
            .clone()
            .or_else(|| std::env::var("NAMESPACE").ok())
            .unwrap_or_else(|| "default".to_string());

        GlobalCoordinates {
            group: self.crd_group.clone(),
            version: self.crd_version.clone(),
            namespace,
            kind: self.crd_kind.clone(),
        }
    }

    pub fn interval(&self) -> Result<Duration, ConfigError> {
        if !self.sync_interval.is_finite() || self.sync_interval <= 0.0 {
            return Err(ConfigError::InvalidInterval { value: self.sync_interval.to_string() });
        }
        Ok(Duration::from_secs_f64(self.sync_interval))
    }

    pub fn policy(&self) -> SyncPolicy {
        SyncPolicy {
            conflict: match self.conflict_policy {
                ConflictPolicyArg::File => ConflictPolicy::PreferFile,
                ConflictPolicyArg::Resource => ConflictPolicy::PreferResource,
            },
            protect_local_on_absent: self.protect_local_on_cr_absent,
            skip_empty_remote: self.skip_empty_cr_to_file,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["crmirror", "--file-map", "/data/a.json=as:a"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--crd-namespace", "default"]);

        assert_eq!(cli.crd_group, "ha.example.com");
        assert_eq!(cli.crd_version, "v1");
        assert_eq!(cli.crd_kind, "Data");
        assert!(cli.in_cluster);
        assert_eq!(cli.interval().unwrap(), Duration::from_secs(5));

        let policy = cli.policy();
        assert_eq!(policy.conflict, ConflictPolicy::PreferFile);
        assert!(policy.protect_local_on_absent);
        assert!(policy.skip_empty_remote);
    }

    #[test]
    fn test_fractional_interval() {
        let cli = parse(&["--sync-interval", "0.5"]);
        assert_eq!(cli.interval().unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn test_rejects_non_positive_interval() {
        let cli = parse(&["--sync-interval", "0"]);
        assert!(matches!(cli.interval(), Err(ConfigError::InvalidInterval { .. })));

        let cli = parse(&["--sync-interval", "-2"]);
        assert!(cli.interval().is_err());
    }

    #[test]
    fn test_conflict_policy_values() {
        let cli = parse(&["--conflict-policy", "resource"]);
        assert_eq!(cli.policy().conflict, ConflictPolicy::PreferResource);
    }

    #[test]
    fn test_booleans_take_explicit_values() {
        let cli = parse(&[
            "--in-cluster",
            "false",
            "--protect-local-on-cr-absent",
            "false",
            "--skip-empty-cr-to-file",
            "false",
        ]);
        assert!(!cli.in_cluster);
        assert!(!cli.policy().protect_local_on_absent);
        assert!(!cli.policy().skip_empty_remote);
    }

    #[test]
    fn test_explicit_coordinates() {
        let cli = parse(&[
            "--crd-group",
            "sync.example.io",
            "--crd-version",
            "v2",
            "--crd-namespace",
            "prod",
            "--crd-kind",
            "Mirror",
        ]);
        let coords = cli.coordinates();
        assert_eq!(coords.group, "sync.example.io");
        assert_eq!(coords.version, "v2");
        assert_eq!(coords.namespace, "prod");
        assert_eq!(coords.kind, "Mirror");
        assert_eq!(coords.api_version(), "sync.example.io/v2");
    }
}
