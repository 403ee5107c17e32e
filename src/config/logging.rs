// src/config/logging.rs
// DOCUMENTATION: Logger initialization
// PURPOSE: Send every log line to stdout and to the run's log file

use crate::config::Config;
use chrono::Local;
use env_logger::{Builder, Target, WriteStyle};
use std::fs::File;
use std::io::{self, Write};

/// Writer duplicating output to stdout and a file
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}

/// Initialize env_logger
/// DOCUMENTATION: RUST_LOG wins over LOG_LEVEL; the log file is truncated on every run
pub fn init_logging(config: &Config) -> io::Result<()> {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if config.log_level.is_empty() {
            "info,sqlx=warn".to_string()
        } else {
            config.log_level.clone()
        }
    });

    if let Some(parent) = config.log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(&config.log_file)?;

    Builder::new()
        .parse_filters(&filters)
        .write_style(WriteStyle::Never)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}
