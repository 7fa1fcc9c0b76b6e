use std::any::Any;
use std::env;
use std::panic;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const DEFAULT_FILTER: &str = "info";

/// Logging knobs read from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSettings {
    /// `SM_LOG_DIR`: write daily-rotated files here instead of stdout.
    pub log_dir: Option<PathBuf>,
    /// `SM_LOG_INCLUDE_BACKTRACE`: also run the default panic hook.
    pub include_backtrace: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            log_dir: env::var_os("SM_LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            include_backtrace: env::var("SM_LOG_INCLUDE_BACKTRACE")
                .map(|value| is_truthy(&value))
                .unwrap_or(false),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Route panics through `tracing` so they land in the same sink as the rest of
/// the service logs. Installed at most once per process.
pub fn install_tracing_panic_hook(app_name: &'static str) {
    static INSTALLED: OnceLock<()> = OnceLock::new();

    INSTALLED.get_or_init(|| {
        let include_backtrace = LogSettings::from_env().include_backtrace;
        let default_hook = panic::take_hook();

        panic::set_hook(Box::new(move |info| {
            let location = info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());

            tracing::error!(
                application = app_name,
                thread = std::thread::current().name().unwrap_or("unnamed"),
                %location,
                panic_message = %panic_message(info.payload()),
                "panic"
            );

            if include_backtrace {
                default_hook(info);
            }
        }));
    });
}

fn file_writer(app_name: &'static str, dir: PathBuf) -> Option<BoxMakeWriter> {
    if let Err(err) = std::fs::create_dir_all(&dir) {
        tracing::warn!(error = %err, dir = %dir.display(), "cannot create log directory; logging to stdout");
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, format!("{app_name}.log"));
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Some(BoxMakeWriter::new(writer))
}

/// Install the global subscriber. Filtering follows `RUST_LOG` (default
/// `info`); see [`LogSettings`] for the output target.
pub fn init_tracing_subscriber(app_name: &'static str) {
    let settings = LogSettings::from_env();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    match settings.log_dir.and_then(|dir| file_writer(app_name, dir)) {
        Some(writer) => {
            let _ = builder.with_writer(writer).with_ansi(false).try_init();
        }
        None => {
            let _ = builder.try_init();
        }
    }
}
