//! # CineRec Core
//!
//! Shared building blocks for the CineRec crates.
//!
//! ## Modules
//!
//! - `error`: Error types and handling
//! - `config`: Environment-based configuration loading and validation
//! - `observability`: Structured logging initialisation

pub mod config;
pub mod error;
pub mod observability;

// Re-export commonly used types
pub use config::{load_dotenv, parse_env_var, ConfigLoader, InsightConfig};
pub use error::CineRecError;
pub use observability::{init_logging, LogConfig, LogFormat, ObservabilityError};

/// Result type alias for CineRec operations
pub type Result<T> = std::result::Result<T, CineRecError>;
