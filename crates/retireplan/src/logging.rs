//! File logging for the `retireplan` binary
//!
//! Projections run non-interactively, so engine events (trial failures,
//! run summaries) go to `retireplan.log` in the data directory instead of
//! mixing with the report on stdout.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "retireplan.log";

const ROTATION_MARKER: &[u8] = b"--- retireplan: earlier log entries trimmed ---\n";

/// Size bounds for the log file, checked once per process start
#[derive(Debug, Clone, Copy)]
struct RotationLimits {
    max_bytes: u64,
    keep_bytes: u64,
}

impl RotationLimits {
    const DEFAULT: Self = Self {
        max_bytes: 5 * 1024 * 1024,
        keep_bytes: 1024 * 1024,
    };
}

/// Cut `log_path` down to its newest whole lines when it is over the limit.
/// Returns whether anything was cut.
fn rotate_log(log_path: &Path, limits: RotationLimits) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size <= limits.max_bytes {
        return Ok(false);
    }

    let mut tail = Vec::new();
    {
        let mut file = File::open(log_path)?;
        file.seek(SeekFrom::Start(size.saturating_sub(limits.keep_bytes)))?;
        file.read_to_end(&mut tail)?;
    }

    // The seek usually lands mid-line
    let first_whole_line = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(&tail[first_whole_line..])?;
    Ok(true)
}

#[derive(Clone)]
struct SharedLogFile(Arc<Mutex<File>>);

struct SharedLogWriter(Arc<Mutex<File>>);

impl SharedLogWriter {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for SharedLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = SharedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter(Arc::clone(&self.0))
    }
}

/// Send `retireplan` events at `level` and engine warnings to the data
/// directory's log file. Returns the log path.
///
/// `RUST_LOG`, when set, replaces the default filter entirely.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE_NAME);

    if let Err(e) = rotate_log(&log_path, RotationLimits::DEFAULT) {
        eprintln!("Warning: could not trim {}: {e}", log_path.display());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("retireplan={level},retireplan_core=warn"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(SharedLogFile(Arc::new(Mutex::new(file))))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "logging to file");
    Ok(log_path)
}
