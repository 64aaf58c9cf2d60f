//! Process-wide tracing setup for the calculator binaries.
//!
//! Records go to stdout and, once [`enable_file_logging`] is called, to a
//! log file as well. The level can be changed at runtime.

use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    Layer, // for .with_filter() on the stdout layer
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

// --- Formatter ---

/// `<local time> <LEVEL> <target>: <fields>`, colored on terminals.
struct CalculatorFormat;

impl<S, N> FormatEvent<S, N> for CalculatorFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        if ansi {
            let color = match *meta.level() {
                Level::ERROR => "\x1b[1;31m",
                Level::WARN => "\x1b[1;33m",
                Level::INFO => "\x1b[1;32m",
                Level::DEBUG => "\x1b[1;34m",
                Level::TRACE => "\x1b[1;35m",
            };
            write!(
                writer,
                "\x1b[2m{timestamp}\x1b[0m {color}{:>5}\x1b[0m \x1b[36m{}\x1b[0m: ",
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{timestamp} {:>5} {}: ", meta.level(), meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type SharedFile = Arc<Mutex<Option<File>>>;

fn lock_file(file: &SharedFile) -> MutexGuard<'_, Option<File>> {
    file.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writes to the log file when one is open and discards records otherwise.
#[derive(Clone)]
struct FileSink(SharedFile);

struct FileSinkWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for FileSinkWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = FileSinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileSinkWriter(lock_file(&self.0))
    }
}

// --- Runtime handles ---

type SetLevelFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;
type SetStdoutFn = Box<dyn Fn(bool) -> Result<()> + Send + Sync>;

struct LogHandles {
    set_level: SetLevelFn,
    set_stdout: SetStdoutFn,
    file: SharedFile,
}

static HANDLES: OnceLock<LogHandles> = OnceLock::new();

fn handles() -> Result<&'static LogHandles> {
    HANDLES
        .get()
        .ok_or_else(|| anyhow::anyhow!("logging not yet initialized"))
}

fn level_setter<S>(handle: reload::Handle<EnvFilter, S>) -> SetLevelFn
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |directive: &str| {
        let filter = EnvFilter::try_new(directive)
            .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))?;
        handle
            .reload(filter)
            .map_err(|e| anyhow::anyhow!("filter reload failed: {e}"))
    })
}

fn stdout_setter<S>(handle: reload::Handle<EnvFilter, S>) -> SetStdoutFn
where
    S: Subscriber + Send + Sync + 'static,
{
    Box::new(move |enabled: bool| {
        // The global level filter still applies on top of this gate.
        let gate = EnvFilter::new(if enabled { "trace" } else { "off" });
        handle
            .reload(gate)
            .map_err(|e| anyhow::anyhow!("stdout reload failed: {e}"))
    })
}

// --- Public API ---

/// Changes the active filter. Accepts a bare level such as `"debug"` or any
/// EnvFilter directive.
pub fn set_log_level(directive: &str) -> Result<()> {
    (handles()?.set_level)(directive)
}

/// Shows or hides stdout output without affecting the log file.
pub fn set_stdout_enabled(enabled: bool) -> Result<()> {
    (handles()?.set_stdout)(enabled)
}

/// Appends log records to `path`, replacing any file already open.
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let handles = handles()?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    *lock_file(&handles.file) = Some(file);
    Ok(())
}

/// Flushes and closes the log file, if any.
pub fn disable_file_logging() {
    if let Some(handles) = HANDLES.get() {
        if let Some(mut file) = lock_file(&handles.file).take() {
            let _ = file.flush();
        }
    }
}

/// Initializes logging. Call once at startup; later calls are no-ops.
///
/// The level defaults to `info` and honours `RUST_LOG`.
pub fn init_default_logging() {
    let file: SharedFile = Arc::new(Mutex::new(None));

    let (level_filter, level_handle) = reload::Layer::new(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    );
    let (stdout_gate, stdout_handle) = reload::Layer::new(EnvFilter::new("trace"));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(CalculatorFormat)
        .with_ansi(io::stdout().is_terminal())
        .with_filter(stdout_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(CalculatorFormat)
        .with_ansi(false)
        .with_writer(FileSink(file.clone()));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = HANDLES.set(LogHandles {
            set_level: level_setter(level_handle),
            set_stdout: stdout_setter(stdout_handle),
            file,
        });
    }
}
