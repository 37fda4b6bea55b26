use anyhow::Context;
use std::{
    fs,
    path::PathBuf,
    time::{Duration, SystemTime},
};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, prelude::*};

use crate::config::{SERVICE_NAME, TrackerConfig};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);
const SECONDS_PER_DAY: u64 = 60 * 60 * 24;

/// Keeps the non-blocking file writer flushing; drop it last.
#[allow(dead_code)]
pub struct LoggerGuard(WorkerGuard);

/// The service's rolled log files and how long they are kept.
#[derive(Debug, Clone)]
pub struct LogFiles {
    dir: PathBuf,
    prefix: String,
    /// `None` keeps every file
    retention: Option<Duration>,
}

impl LogFiles {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, retention_days: u64) -> Self {
        let retention = (retention_days > 0)
            .then(|| Duration::from_secs(retention_days.saturating_mul(SECONDS_PER_DAY)));
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            retention,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(&config.log_dir, SERVICE_NAME, config.log_retention_days)
    }

    pub fn retention(&self) -> Option<Duration> {
        self.retention
    }

    fn is_ours(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.prefix) && file_name.ends_with(".log")
    }

    /// Delete this service's log files older than the retention period.
    pub fn sweep(&self) -> std::io::Result<usize> {
        let Some(retention) = self.retention else {
            return Ok(0);
        };
        remove_older_than(self, retention)
    }

    /// Sweep now and then hourly. Does nothing when retention is off.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn_sweeper(self) {
        if self.retention.is_none() {
            tracing::debug!("Log retention disabled; keeping all files in {}", self.dir.display());
            return;
        }

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                ticker.tick().await;
                match self.sweep() {
                    Ok(0) => {}
                    Ok(n) => tracing::info!("Removed {} expired log file(s) from {}", n, self.dir.display()),
                    Err(e) => tracing::warn!("Log sweep of {} failed: {}", self.dir.display(), e),
                }
            }
        });
    }
}

fn remove_older_than(files: &LogFiles, max_age: Duration) -> std::io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(&files.dir)? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !files.is_ours(file_name) {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > max_age {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Console + daily rolling file logging for the service. `RUST_LOG`
/// refines `log_level`; expired files are swept in the background.
///
/// Must be called inside a tokio runtime.
pub fn init_logging(config: &TrackerConfig) -> anyhow::Result<LoggerGuard> {
    let files = LogFiles::from_config(config);

    let builder = EnvFilter::builder().with_default_directive(normalize_level(&config.log_level).into());
    let rust_log = std::env::var("RUST_LOG").unwrap_or_default();
    let console_filter = builder.clone().parse_lossy(&rust_log);
    let file_filter = builder.parse_lossy(&rust_log);

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&files.prefix)
        .filename_suffix("log")
        .build(&files.dir)
        .with_context(|| format!("Failed to open log directory {}", files.dir.display()))?;
    let (writer, guard) = NonBlocking::new(appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(fmt::layer().with_writer(std::io::stdout).with_filter(console_filter))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    files.spawn_sweeper();

    Ok(LoggerGuard(guard))
}

fn normalize_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', defaulting to 'info'", level);
        LevelFilter::INFO
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_level() {
        assert_eq!(normalize_level("debug"), LevelFilter::DEBUG);
        assert_eq!(normalize_level("WARN"), LevelFilter::WARN);
        assert_eq!(normalize_level("loud"), LevelFilter::INFO);
    }

    #[test]
    fn test_log_files_follow_config() {
        let mut config = TrackerConfig::default();
        config.log_dir = "/var/log/iss".to_string();
        config.log_retention_days = 14;

        let files = LogFiles::from_config(&config);
        assert_eq!(files.prefix, SERVICE_NAME);
        assert_eq!(files.dir, Path::new("/var/log/iss"));
        assert_eq!(files.retention(), Some(Duration::from_secs(14 * SECONDS_PER_DAY)));

        config.log_retention_days = 0;
        assert_eq!(LogFiles::from_config(&config).retention(), None);
    }

    #[test]
    fn test_sweep_respects_retention_and_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let ours = temp_dir.path().join(format!("{}.2026-01-01.log", SERVICE_NAME));
        fs::write(&ours, "x").unwrap();
        fs::write(temp_dir.path().join("other.log"), "x").unwrap();

        // Fresh files survive a day-long retention
        let files = LogFiles::new(temp_dir.path(), SERVICE_NAME, 1);
        assert_eq!(files.sweep().unwrap(), 0);

        // Disabled retention never deletes
        let keep_all = LogFiles::new(temp_dir.path(), SERVICE_NAME, 0);
        assert_eq!(keep_all.sweep().unwrap(), 0);

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(remove_older_than(&files, Duration::ZERO).unwrap(), 1);
        assert!(!ours.exists());
        assert!(temp_dir.path().join("other.log").exists());
    }
}
