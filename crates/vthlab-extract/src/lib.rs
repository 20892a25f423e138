//! Gate-source threshold-voltage extraction.
//!
//! Given a [`vthlab_core::TraceSet`] from a temperature-stepped DC sweep,
//! this crate locates the sweep step nearest a target temperature, resolves
//! the gate-voltage and drain-current traces, and interpolates the
//! gate-source voltage at which the drain current crosses a target value.
//!
//! The computation is pure and synchronous: it owns no state, performs no
//! I/O, and is safe to run concurrently on independent inputs.

pub mod interp;
pub mod vth;

pub use interp::interp_clamped;
pub use vth::{
    DRAIN_CURRENT_CANDIDATES, GATE_VOLTAGE_TRACE, VthConfig, VthResult, extract_vth,
};
