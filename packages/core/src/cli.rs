use clap::Parser;

/// Follower sync CLI arguments.
///
/// Every flag is optional and overrides the matching environment setting.
#[derive(Debug, Default, Parser)]
#[command(
    name = "follower-sync",
    version,
    about = "Sync tracked account follower counts into the record store and report anomalies"
)]
pub struct Cli {
    /// Attempts per account against the metrics provider
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Seconds to wait between provider attempts
    #[arg(long)]
    pub retry_delay: Option<u64>,

    /// Timeout in seconds for every outbound HTTP request
    #[arg(long)]
    pub http_timeout: Option<u64>,

    /// Threshold used for records that do not carry their own
    #[arg(long)]
    pub default_threshold: Option<i64>,
}
