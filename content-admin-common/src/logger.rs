use content_admin_error::{AdminError, AdminResult};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{subscriber::set_global_default, Level, Metadata};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    filter::{filter_fn, FilterFn},
    fmt,
    layer::SubscriberExt,
    Layer, Registry,
};

const LOG_FILE_PREFIX: &str = "content-admin.log";

/// Console plus daily-rolling file logging with a level that can be changed
/// at runtime.
pub struct Logger {
    level: Arc<Mutex<Level>>,
    _file_guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn new(level: Option<Level>) -> Self {
        Logger {
            level: Arc::new(Mutex::new(level.unwrap_or(Level::INFO))),
            _file_guard: None,
        }
    }

    #[inline]
    pub fn set_level(&self, new_level: Level) {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner) = new_level;
    }

    #[inline]
    pub fn level(&self) -> Level {
        *self.level.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install the global subscriber, writing files under `log_dir`.
    pub fn initialize(&mut self, log_dir: &str) -> AdminResult<()> {
        let file_appender = rolling::daily(log_dir, LOG_FILE_PREFIX);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        self._file_guard = Some(guard);

        let console_layer = {
            #[cfg(debug_assertions)]
            let layer = fmt::layer()
                .pretty()
                .with_writer(std::io::stdout)
                .with_file(true)
                .with_line_number(true);

            #[cfg(not(debug_assertions))]
            let layer = fmt::layer().with_writer(std::io::stdout);

            layer.with_filter(self.filter())
        };

        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .with_filter(self.filter());

        let subscriber = Registry::default().with(console_layer).with(file_layer);
        set_global_default(subscriber)
            .map_err(|e| AdminError::InitializationError(format!("Failed to set logger: {e}")))
    }

    fn filter(&self) -> FilterFn<impl Fn(&Metadata<'_>) -> bool> {
        let level = Arc::clone(&self.level);
        filter_fn(move |metadata| {
            metadata.level() <= &*level.lock().unwrap_or_else(PoisonError::into_inner)
        })
    }
}
