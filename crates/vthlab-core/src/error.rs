//! Error types for trace data access.

use thiserror::Error;

/// Errors that can occur while accessing trace data.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// None of the requested trace names exist in the trace set.
    #[error("trace not found (tried {requested:?}); available traces: {available:?}")]
    TraceNotFound {
        /// Names that were tried, in resolution order.
        requested: Vec<String>,
        /// Every trace name present in the set.
        available: Vec<String>,
    },

    /// A trace exists but cannot yield a waveform at the requested step.
    #[error("trace '{trace}' has no usable waveform at step {step} ({num_steps} steps recorded)")]
    WaveformUnavailable {
        /// Name of the trace that was queried.
        trace: String,
        /// Step index that was requested.
        step: usize,
        /// Number of steps the trace actually holds.
        num_steps: usize,
    },
}

/// Result type for trace data access.
pub type Result<T> = std::result::Result<T, Error>;
