//! Process-wide logger assembly.
//!
//! # Data Flow
//! ```text
//! LogfanConfig
//!     → ConsoleEncoder + LockedWriter(stderr)   IoCore @ console.level
//!     → JsonEncoder + ConnectionPool            IoCore @ structured.level
//!     → Tee(console, structured)
//!     → RoutingCore(default Sampler, Tee, relaxed Sampler)
//!     → Logger (root)
//! ```
//!
//! # Design Decisions
//! - One assembly per process, installed once with [`init`]
//! - [`global`] falls back to a default assembly so logging works before `init`
//! - Transport code only sees `add_subscriber` / `remove_subscriber`

use std::sync::{Arc, OnceLock};

use crate::config::{validate_config, ConfigError, LogfanConfig};
use crate::encoding::{ConsoleEncoder, JsonEncoder};
use crate::error::InitError;
use crate::logger::Logger;
use crate::pipeline::{Core, IoCore, Tee};
use crate::sampling::{RouteRules, RoutingCore, Sampler, SamplingPolicy};
use crate::sink::{ConnectionPool, LockedWriter, Sink, Subscriber, SubscriberId};

static GLOBAL: OnceLock<LogAssembly> = OnceLock::new();

/// Encoders, sinks, sampling and the subscriber pool, wired together.
#[derive(Debug, Clone)]
pub struct LogAssembly {
    logger: Logger,
    pool: Arc<ConnectionPool>,
}

impl LogAssembly {
    /// Build an assembly writing console output to stderr.
    pub fn build(config: &LogfanConfig) -> Result<Self, ConfigError> {
        Self::with_console(config, Arc::new(LockedWriter::stderr()))
    }

    /// Build an assembly writing console output to `console`.
    pub fn with_console(config: &LogfanConfig, console: Arc<dyn Sink>) -> Result<Self, ConfigError> {
        validate_config(config).map_err(ConfigError::Validation)?;
        Ok(Self::assemble(config, console))
    }

    fn assemble(config: &LogfanConfig, console: Arc<dyn Sink>) -> Self {
        let pool = Arc::new(ConnectionPool::new());

        let console_core = IoCore::new(
            Arc::new(ConsoleEncoder::new(config.console.color)),
            Arc::clone(&console),
            config.console.level,
        );
        let structured_core = IoCore::new(
            Arc::new(JsonEncoder::new()),
            Arc::clone(&pool) as Arc<dyn Sink>,
            config.structured.level,
        );
        let tee: Arc<dyn Core> = Arc::new(Tee::new(vec![
            Arc::new(console_core),
            Arc::new(structured_core),
        ]));

        let default = Sampler::new(
            Arc::clone(&tee),
            SamplingPolicy::from(config.sampling.default),
            "default",
        );
        let relaxed = Sampler::new(
            Arc::clone(&tee),
            SamplingPolicy::from(config.sampling.relaxed),
            "relaxed",
        );
        let routing = RoutingCore::new(
            Arc::new(default),
            tee,
            Arc::new(relaxed),
            RouteRules::from(&config.sampling),
        );

        Self {
            // Write errors share the console handle so lines never interleave.
            logger: Logger::new(Arc::new(routing)).with_error_output(console),
            pool,
        }
    }

    /// The root logger. All named loggers should derive from it.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }

    /// Subscribe `conn` to structured log output. Remove it with
    /// [`remove_subscriber`](Self::remove_subscriber) when it closes.
    pub fn add_subscriber(&self, conn: Arc<dyn Subscriber>) {
        self.pool.subscribe(conn);
    }

    /// Stop sending logs to `id`. Idempotent.
    pub fn remove_subscriber(&self, id: SubscriberId) {
        self.pool.unsubscribe(id);
    }

    /// Replace the root logger, e.g. to install a different clock.
    pub fn map_logger(mut self, f: impl FnOnce(Logger) -> Logger) -> Self {
        self.logger = f(self.logger);
        self
    }
}

/// Install the process-wide assembly. Fails if one is already installed,
/// including the default one created by an earlier [`global`] call.
pub fn init(config: &LogfanConfig) -> Result<&'static LogAssembly, InitError> {
    let assembly = LogAssembly::build(config)?;
    GLOBAL
        .set(assembly)
        .map_err(|_| InitError::AlreadyInitialized)?;
    GLOBAL.get().ok_or(InitError::AlreadyInitialized)
}

/// The process-wide assembly, built from defaults if [`init`] was never called.
pub fn global() -> &'static LogAssembly {
    GLOBAL.get_or_init(|| {
        LogAssembly::assemble(&LogfanConfig::default(), Arc::new(LockedWriter::stderr()))
    })
}

/// The process-wide root logger.
pub fn log() -> &'static Logger {
    global().logger()
}

/// Subscribe `conn` to the process-wide structured output.
pub fn add_subscriber(conn: Arc<dyn Subscriber>) {
    global().add_subscriber(conn);
}

/// Unsubscribe `id` from the process-wide structured output. Idempotent.
pub fn remove_subscriber(id: SubscriberId) {
    global().remove_subscriber(id);
}
