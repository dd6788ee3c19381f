//! Status line reporting (console and log-file sinks)

use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{info, warn};

/// Receives one human-readable status line together with the instant it was
/// produced. How the line is rendered is up to the sink.
pub trait ReportSink: Send {
    fn emit(&mut self, at: DateTime<Local>, line: &str) -> io::Result<()>;
}

/// Writes bare lines to stdout.
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn emit(&mut self, _at: DateTime<Local>, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }
}

/// Appends timestamped lines to a log file.
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl ReportSink for FileSink {
    fn emit(&mut self, at: DateTime<Local>, line: &str) -> io::Result<()> {
        writeln!(self.file, "{} - {}", at.format("%Y-%m-%d %H:%M:%S"), line)
    }
}

/// Fans each status line out to every attached sink with one shared
/// timestamp.
///
/// A sink that fails is dropped so a bad sink (say, a log file on a full
/// disk) never stops monitoring; the remaining sinks keep receiving lines.
/// Should every sink fail, lines are routed through the diagnostic log
/// instead.
pub struct Reporter {
    sinks: Vec<Box<dyn ReportSink>>,
    exhausted: bool,
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            exhausted: false,
        }
    }

    pub fn attach(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
        self.exhausted = false;
    }

    pub fn report(&mut self, line: &str) {
        let at = Local::now();
        self.sinks.retain_mut(|sink| match sink.emit(at, line) {
            Ok(()) => true,
            Err(err) => {
                warn!("status sink failed, dropping it: {}", err);
                false
            }
        });
        if self.sinks.is_empty() {
            if !self.exhausted {
                self.exhausted = true;
                warn!("no usable status sink remains; status lines continue in the log");
            }
            info!("{}", line);
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
