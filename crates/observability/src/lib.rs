//! Tracing/logging setup shared by shoplytics binaries.

/// Initialize process-wide logging with the format chosen by `SHOPLYTICS_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::LogFormat;
