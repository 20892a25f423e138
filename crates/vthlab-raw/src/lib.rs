//! SPICE rawfile ingestion.
//!
//! Reads the `.raw` waveform output written by ngspice and LTspice into a
//! [`vthlab_core::TraceSet`]:
//!
//! - ASCII (`Values:`) and little-endian binary (`Binary:`) data sections
//! - UTF-8/ASCII and UTF-16LE encoded headers
//! - Stepped plots (`.step` runs), split at abscissa restarts, and files
//!   holding several concatenated plot blocks
//!
//! Complex (AC) rawfiles are rejected with [`RawError::Unsupported`].

pub mod error;
pub mod header;
mod reader;

pub use error::{RawError, Result};
pub use header::{Flags, Header, Variable};
pub use reader::{RawPlot, parse_raw, read_raw};
