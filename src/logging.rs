//! Logging utilities for aws-failure-taxonomy
//!
//! Re-exports tracing macros with log_* naming convention for consistency.
//! The crate never installs a subscriber; that is the embedding application's job.

// Re-export tracing macros with log_* naming
pub use tracing::{debug as log_debug, error as log_error, info as log_info, warn as log_warn};
