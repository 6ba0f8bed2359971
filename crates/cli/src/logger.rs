//! Logger for the elastibox CLI. Messages go to stderr and, when requested,
//! to a file at ~/.elastibox/logs/{run_id}/log.

use anyhow::{Context, Result};
use chrono::Local;
use dirs::home_dir;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct ElastiboxLogger {
    level: LevelFilter,
    file: Option<Arc<Mutex<File>>>,
    run_id: String,
    log_path: Option<PathBuf>,
}

impl ElastiboxLogger {
    /// Create a logger for this run. With `to_file` the log file is created
    /// under the run's directory.
    pub fn new(level: LevelFilter, to_file: bool) -> Result<Self> {
        let run_id = Self::run_id();

        let (file, log_path) = if to_file {
            let log_dir = Self::get_log_dir(&run_id)?;
            create_dir_all(&log_dir).with_context(|| {
                format!("Failed to create log directory: {}", log_dir.display())
            })?;

            let log_path = log_dir.join("log");
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
            (Some(Arc::new(Mutex::new(file))), Some(log_path))
        } else {
            (None, None)
        };

        Ok(Self {
            level,
            file,
            run_id,
            log_path,
        })
    }

    /// `{timestamp}_{first uuid group}`
    fn run_id() -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid_string = Uuid::new_v4().to_string();
        let uuid = uuid_string.split('-').next().unwrap_or("unknown");
        format!("{timestamp}_{uuid}")
    }

    pub fn get_log_dir(run_id: &str) -> Result<PathBuf> {
        let home = home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
        Ok(home.join(".elastibox").join("logs").join(run_id))
    }

    pub fn init(level: LevelFilter, to_file: bool) -> Result<()> {
        let logger = Self::new(level, to_file)?;
        let run_id = logger.run_id.clone();
        let log_path = logger.log_path.clone();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::info!("Elastibox logger initialized. Run ID: {}", run_id);
        if let Some(log_path) = log_path {
            log::info!("Log file: {}", log_path.display());
        }
        Ok(())
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for ElastiboxLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = Self::format(record);

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                // Write failures are dropped
                let _ = writeln!(file, "{}", message);
                let _ = file.flush();
            }
        }

        eprintln!("{}", message);
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;

    #[test]
    fn run_id_is_timestamp_and_uuid_prefix() {
        let run_id = ElastiboxLogger::run_id();
        let parts: Vec<&str> = run_id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 8);
    }

    #[test]
    fn respects_level_filter() {
        let logger = ElastiboxLogger::new(LevelFilter::Info, false).unwrap();
        let info = Metadata::builder().level(Level::Info).build();
        let debug = Metadata::builder().level(Level::Debug).build();
        assert!(logger.enabled(&info));
        assert!(!logger.enabled(&debug));
        assert!(logger.log_path.is_none());
    }

    #[test]
    fn installs_as_the_global_logger() {
        ElastiboxLogger::init(LevelFilter::Warn, false).unwrap();
        assert_eq!(log::max_level(), LevelFilter::Warn);
        assert!(log::log_enabled!(log::Level::Warn));
        assert!(!log::log_enabled!(log::Level::Info));
    }

    #[test]
    fn log_dir_is_keyed_by_run() {
        if home_dir().is_none() {
            return;
        }
        let dir = ElastiboxLogger::get_log_dir("20260101_000000_abcd1234").unwrap();
        assert!(dir.ends_with(".elastibox/logs/20260101_000000_abcd1234"));
    }
}
