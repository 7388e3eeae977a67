//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogfanConfig (validated, immutable)
//!     → LogAssembly::build / logfan binary
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the assembly is a process-wide singleton
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ConsoleConfig, LogfanConfig, ObservabilityConfig, PolicyConfig, SamplingConfig, ServerConfig,
    StructuredConfig,
};
pub use validation::{validate_config, ValidationError};
