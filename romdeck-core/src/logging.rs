use std::{
    fmt::Write as _,
    fs,
    path::PathBuf,
    sync::OnceLock,
    sync::atomic::{AtomicUsize, Ordering},
};

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};
use tracing::{
    Metadata,
    field::{Field, Visit},
};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        self, FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    prelude::*,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggerConfig {
    pub log_dir: PathBuf,
    pub log_file_prefix: CompactString,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_level: CompactString,
    pub max_log_files: usize,
    pub rotation: LogRotation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,
    Daily,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            log_file_prefix: CompactString::const_new("romdeck"),
            log_level: CompactString::const_new("info"),
            max_log_files: 10,
            rotation: LogRotation::Daily,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub struct Logger;

impl Logger {
    /// Call **once** near the start of `main` and keep the guard alive until
    /// exit; dropping it flushes the file writer.
    ///
    /// Only a file layer is installed: the terminal belongs to the UI.
    pub fn init_tracing(config: &LoggerConfig) -> Result<WorkerGuard, LoggingError> {
        // create logs/ if missing
        fs::create_dir_all(&config.log_dir)?;

        SEQ.get_or_init(|| AtomicUsize::new(1));

        let rotation = match config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
        };

        // rolling file appender → logs/romdeck.YYYY-MM-DD.log
        let file_appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(config.log_file_prefix.as_str())
            .filename_suffix("log")
            .max_log_files(config.max_log_files)
            .build(&config.log_dir)
            .map_err(|e| LoggingError::ConfigError(e.to_string()))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.log_level.as_str()))
            .map_err(|e| LoggingError::ConfigError(e.to_string()))?;

        let file_layer = fmt::layer()
            .event_format(SeqFileMod) // our compact formatter
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(file_layer)
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        Ok(guard)
    }
}

static SEQ: OnceLock<AtomicUsize> = OnceLock::new();

const MARKER_FIELD: &str = "marker";
const OPERATION_TYPE_FIELD: &str = "operation_type";

/// Event fields split into the parts the line format places separately.
#[derive(Debug, Default)]
struct EventFields {
    message: String,
    marker: CompactString,
    operation_type: CompactString,
    /// Remaining fields as ` key=value` pairs.
    extra: String,
}

impl EventFields {
    fn push_extra(&mut self, name: &str, value: std::fmt::Arguments<'_>) {
        let _ = write!(self.extra, " {name}={value}");
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            MARKER_FIELD => self.marker = CompactString::new(value),
            OPERATION_TYPE_FIELD => self.operation_type = CompactString::new(value),
            name => self.push_extra(name, format_args!("{value}")),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{value:?}");
            }
            MARKER_FIELD => self.marker = format_compact!("{value:?}"),
            OPERATION_TYPE_FIELD => self.operation_type = format_compact!("{value:?}"),
            name => self.push_extra(name, format_args!("{value:?}")),
        }
    }
}

/// Line format:
/// `SEQ HH:MM:SS.mmm LEVEL [file:line mod::path] [MARKER:operation] message key=value`
///
/// The marker block is left out for events without a `marker` field.
struct SeqFileMod;

impl<S, N> FormatEvent<S, N> for SeqFileMod
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut w: Writer<'_>,
        ev: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let seq: usize = SEQ.get().map_or(0, |seq| seq.fetch_add(1, Ordering::Relaxed));

        let mut fields = EventFields::default();
        ev.record(&mut fields);

        let meta: &'static Metadata<'static> = ev.metadata();
        write!(
            w,
            "{seq:06} {} {:5} [{}:{} {}] ",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            meta.level(),
            meta.file().unwrap_or("??"),
            meta.line().unwrap_or(0),
            meta.module_path().unwrap_or("???"),
        )?;

        match (fields.marker.is_empty(), fields.operation_type.is_empty()) {
            (true, _) => {}
            (false, true) => write!(w, "[{}] ", fields.marker)?,
            (false, false) => write!(w, "[{}:{}] ", fields.marker, fields.operation_type)?,
        }

        writeln!(w, "{}{}", fields.message, fields.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_lines(emit: impl FnOnce()) -> Vec<String> {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(SeqFileMod)
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, emit);

        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn test_marker_and_operation_type_lead_the_message() {
        let lines = capture_lines(|| {
            tracing::info!(
                marker = "POPULATE_COMPLETE",
                operation_type = "populate",
                accepted = 3,
                "Found {} ROMs",
                3
            );
            tracing::warn!(marker = "ASSET_MISSING", asset = %"images/browser-icon", "Row icon unavailable");
            tracing::debug!("plain event");
        });

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].ends_with("[POPULATE_COMPLETE:populate] Found 3 ROMs accepted=3"));
        assert!(lines[1].ends_with("[ASSET_MISSING] Row icon unavailable asset=images/browser-icon"));
        assert!(lines[2].ends_with("] plain event"));
        assert!(!lines[2].contains("marker"));
    }

    #[test]
    fn test_init_writes_into_log_dir_once() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            log_dir: temp_dir.path().join("logs"),
            rotation: LogRotation::Never,
            ..LoggerConfig::default()
        };

        let guard = Logger::init_tracing(&config).unwrap();
        tracing::error!("logging initialised for test");
        drop(guard);

        let log_file = config.log_dir.join("romdeck.log");
        let content = fs::read_to_string(&log_file).unwrap();
        assert!(content.contains("logging initialised for test"));
        assert!(content.contains("ERROR"));

        assert!(matches!(
            Logger::init_tracing(&config),
            Err(LoggingError::AlreadyInitialized)
        ));
    }
}
