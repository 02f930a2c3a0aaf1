use std::net::IpAddr;
use std::path::PathBuf;

use tracing::trace;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    /// Address the shared UDP socket binds to
    #[serde(default = "default_listen_address")]
    pub listen_address: IpAddr,

    pub udp_port: u16,

    /// Number of listener tasks sharing the socket
    #[serde(default = "default_listeners")]
    pub listeners: usize,

    /// How often the in-memory buffer is flushed to the active log file
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,

    /// Rotate the active file once it reaches this size
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Rotate the active file once its mtime is older than this
    #[serde(default = "default_max_file_age_ms")]
    pub max_file_age_ms: u64,

    /// Path of the active log file; rotated files land in its directory
    #[serde(default = "default_log_file_path")]
    pub log_file_path: PathBuf,

    /// Capacity of the listener → coordinator channel; lines are dropped
    /// silently once it is full
    #[serde(default = "default_forward_queue_size")]
    pub forward_queue_size: usize,

    pub store: StoreConfig,

    pub smtp: SmtpConfig,

    /// Alert rules, evaluated in order against every incoming line
    #[serde(default)]
    pub actions: Vec<ActionRule>,
}

/// Object storage destination for rotated log files
#[derive(Debug, Clone, serde::Deserialize)]
pub struct StoreConfig {
    pub bucket: String,

    /// Key prefix under which dated folders are created
    pub folder: String,

    pub region: Option<String>,

    /// Custom endpoint for S3-compatible services (MinIO etc.)
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    pub username: String,
    pub password: String,

    /// Sender address for alert mails
    pub from: String,
}

/// A pattern-to-notification mapping evaluated per log line
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ActionRule {
    /// Regular expression tested against the raw line
    pub expression: String,

    #[serde(rename = "type")]
    pub kind: ActionKind,

    pub subject: String,

    /// Recipient address
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Email,

    /// Unknown kinds parse but never fire
    #[serde(other)]
    Unsupported,
}

fn default_listen_address() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0))
}

fn default_listeners() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_flush_interval_ms() -> u64 {
    5000
}

fn default_max_file_size_bytes() -> u64 {
    1_000_000
}

fn default_max_file_age_ms() -> u64 {
    60_000
}

fn default_log_file_path() -> PathBuf {
    PathBuf::from("log-sync/temp.txt")
}

fn default_forward_queue_size() -> usize {
    1024
}

fn default_smtp_port() -> u16 {
    587
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))
        .inspect(|config: &Config| trace!("loaded config: {config:?}"))
}
