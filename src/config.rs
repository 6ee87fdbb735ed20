use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const CAPTURE_PREFIX: &str = "scanfile";
pub const BACKUP_DIR: &str = "backup_csvs";
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(1000);
pub const STOP_TIMEOUT: Duration = Duration::from_millis(3000);
pub const MONITOR_SETTLE: Duration = Duration::from_millis(1000);

#[derive(Parser, Debug)]
#[command(name = "airsurvey")]
#[command(author = "Ryan Butler")]
#[command(about = "Passive wireless survey on top of airmon-ng and airodump-ng.", long_about = None)]
pub struct Arguments {
    #[arg(long, default_value = CAPTURE_PREFIX)]
    /// Filename prefix handed to airodump-ng.
    pub prefix: String,

    #[arg(long, default_value = BACKUP_DIR)]
    /// Directory old CSV files are moved into before a session.
    pub backup_dir: String,

    #[arg(long, default_value = ".")]
    /// Directory the capture files are written to.
    pub workdir: PathBuf,

    #[arg(long, default_value_t = 1000)]
    /// Table refresh interval.
    pub interval_ms: u64,

    #[arg(long, default_value_t = 3000)]
    /// Grace period before the capture process is killed.
    pub stop_timeout_ms: u64,

    #[arg(long, default_value_t = 1000)]
    /// Delay after airmon-ng before interfaces are re-read.
    pub settle_ms: u64,

    #[arg(short, long)]
    /// Only echo errors from the status log.
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub prefix: String,
    pub backup_dir: String,
    pub workdir: PathBuf,
    pub refresh_interval: Duration,
    pub stop_timeout: Duration,
    pub monitor_settle: Duration,
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prefix: CAPTURE_PREFIX.to_string(),
            backup_dir: BACKUP_DIR.to_string(),
            workdir: PathBuf::from("."),
            refresh_interval: REFRESH_INTERVAL,
            stop_timeout: STOP_TIMEOUT,
            monitor_settle: MONITOR_SETTLE,
            quiet: false,
        }
    }
}

impl From<Arguments> for Config {
    fn from(args: Arguments) -> Self {
        Config {
            prefix: args.prefix,
            backup_dir: args.backup_dir,
            workdir: args.workdir,
            refresh_interval: Duration::from_millis(args.interval_ms),
            stop_timeout: Duration::from_millis(args.stop_timeout_ms),
            monitor_settle: Duration::from_millis(args.settle_ms),
            quiet: args.quiet,
        }
    }
}
