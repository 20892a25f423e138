//! Threshold-voltage extraction at the sweep step nearest a target temperature.

use vthlab_core::sweep::nearest_step;
use vthlab_core::{Error, Result, Trace, TraceSet};

use crate::interp::interp_clamped;

/// Fixed name of the gate-source voltage trace in the characterization netlist.
pub const GATE_VOLTAGE_TRACE: &str = "V(v_g_d)";

/// Drain-current trace names to try, most preferred first.
///
/// Pin naming differs between device-model conventions (`D` vs `DRAIN`,
/// subcircuit wrappers vs plain M devices), so resolution walks this list
/// case-insensitively.
pub const DRAIN_CURRENT_CANDIDATES: [&str; 4] =
    ["Ix(xu1:D)", "Ix(xu1:DRAIN)", "Id(XU1)", "Id(M1)"];

/// Extraction parameters.
#[derive(Debug, Clone)]
pub struct VthConfig {
    /// Temperature the analyzed sweep step should be nearest to (degC).
    pub target_temperature_c: f64,
    /// Drain-current magnitude defining the threshold (A).
    pub target_current_a: f64,
    /// Sweep-parameter value of each step, in step order (degC).
    pub sweep_values_c: Vec<f64>,
}

impl Default for VthConfig {
    fn default() -> Self {
        Self {
            target_temperature_c: 25.0,
            target_current_a: 1e-3,
            sweep_values_c: vthlab_core::sweep::temperature_sweep(),
        }
    }
}

/// Result of one threshold extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct VthResult {
    /// Gate-source voltage at which the drain current reaches the target (V).
    pub threshold_volts: f64,
    /// Gate-source voltage samples of the analyzed step, as simulated.
    pub vgs_volts: Vec<f64>,
    /// Drain-current samples of the analyzed step, as simulated.
    pub id_amps: Vec<f64>,
}

/// Extract Vgs(th) from `traces` at the sweep step nearest the target
/// temperature.
///
/// The drain-current waveform supplies the abscissae and the gate-voltage
/// waveform the ordinates of a clamped linear interpolation evaluated at
/// the target current. An empty or garbled sweep-value list selects step 0
/// instead of failing; every other problem surfaces as a typed error. The
/// input trace set is never mutated, so identical inputs give identical
/// results.
pub fn extract_vth(traces: &TraceSet, cfg: &VthConfig) -> Result<VthResult> {
    let step = nearest_step(&cfg.sweep_values_c, cfg.target_temperature_c);
    match cfg.sweep_values_c.get(step) {
        Some(value) => log::info!("analyzing sweep step {step} (~{value} degC)"),
        None => log::info!("analyzing sweep step {step}"),
    }

    let vgs_trace = traces
        .trace_ignore_case(GATE_VOLTAGE_TRACE)
        .ok_or_else(|| Error::TraceNotFound {
            requested: vec![GATE_VOLTAGE_TRACE.to_string()],
            available: traces.names(),
        })?;
    let id_trace = resolve_drain_current(traces)?;

    let vgs_volts = vgs_trace.wave(step)?.to_vec();
    let id_amps = id_trace.wave(step)?.to_vec();

    // mismatched sample counts mean the rawfile is not usable at this step
    let threshold_volts = interp_clamped(&id_amps, &vgs_volts, cfg.target_current_a)
        .ok_or_else(|| Error::WaveformUnavailable {
            trace: id_trace.name().to_string(),
            step,
            num_steps: id_trace.num_steps(),
        })?;

    Ok(VthResult {
        threshold_volts,
        vgs_volts,
        id_amps,
    })
}

/// Find the drain-current trace, trying each naming convention in order.
fn resolve_drain_current(traces: &TraceSet) -> Result<&Trace> {
    for name in DRAIN_CURRENT_CANDIDATES {
        if let Some(trace) = traces.trace_ignore_case(name) {
            log::debug!("resolved drain-current trace '{}'", trace.name());
            return Ok(trace);
        }
    }
    Err(Error::TraceNotFound {
        requested: DRAIN_CURRENT_CANDIDATES
            .iter()
            .map(|s| s.to_string())
            .collect(),
        available: traces.names(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vthlab_core::TraceKind;

    fn single_step_set(current_name: &str) -> TraceSet {
        let mut set = TraceSet::new();
        set.insert(Trace::new(
            "V(v_g_d)",
            TraceKind::Voltage,
            vec![vec![1.0, 2.0, 3.0]],
        ));
        set.insert(Trace::new(
            current_name,
            TraceKind::Current,
            vec![vec![0.0, 1e-3, 2e-3]],
        ));
        set
    }

    fn single_step_config() -> VthConfig {
        VthConfig {
            sweep_values_c: vec![25.0],
            ..VthConfig::default()
        }
    }

    #[test]
    fn test_extract_interpolates_threshold() {
        let set = single_step_set("Ix(xu1:D)");
        let cfg = VthConfig {
            target_current_a: 1.5e-3,
            ..single_step_config()
        };
        let result = extract_vth(&set, &cfg).expect("extraction failed");
        assert_eq!(result.threshold_volts, 2.5);
    }

    #[test]
    fn test_extract_clamps_out_of_range_targets() {
        let set = single_step_set("Ix(xu1:D)");
        let low = VthConfig {
            target_current_a: -1.0,
            ..single_step_config()
        };
        let high = VthConfig {
            target_current_a: 5e-3,
            ..single_step_config()
        };
        assert_eq!(extract_vth(&set, &low).unwrap().threshold_volts, 1.0);
        assert_eq!(extract_vth(&set, &high).unwrap().threshold_volts, 3.0);
    }

    #[test]
    fn test_extract_returns_waveforms_unmodified() {
        let set = single_step_set("Ix(xu1:D)");
        let result = extract_vth(&set, &single_step_config()).expect("extraction failed");
        assert_eq!(result.vgs_volts, vec![1.0, 2.0, 3.0]);
        assert_eq!(result.id_amps, vec![0.0, 1e-3, 2e-3]);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let set = single_step_set("Ix(xu1:D)");
        let cfg = single_step_config();
        let first = extract_vth(&set, &cfg).expect("extraction failed");
        let second = extract_vth(&set, &cfg).expect("extraction failed");
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolution_is_case_insensitive() {
        // recorded as uppercase D pin, requested candidate is lowercase
        let set = single_step_set("Ix(XU1:D)");
        assert!(extract_vth(&set, &single_step_config()).is_ok());
    }

    #[test]
    fn test_resolution_prefers_earlier_candidates() {
        let mut set = single_step_set("Id(M1)");
        set.insert(Trace::new(
            "Ix(xu1:DRAIN)",
            TraceKind::Current,
            vec![vec![0.0, 2e-3, 4e-3]],
        ));
        let cfg = VthConfig {
            target_current_a: 2e-3,
            ..single_step_config()
        };
        // Ix(xu1:DRAIN) outranks Id(M1): its waveform maps 2e-3 onto 2.0
        let result = extract_vth(&set, &cfg).expect("extraction failed");
        assert_eq!(result.threshold_volts, 2.0);
    }

    #[test]
    fn test_missing_current_trace_lists_available_names() {
        let mut set = TraceSet::new();
        set.insert(Trace::new(
            "V(v_g_d)",
            TraceKind::Voltage,
            vec![vec![1.0, 2.0]],
        ));
        set.insert(Trace::new(
            "I(R1)",
            TraceKind::Current,
            vec![vec![0.0, 1e-3]],
        ));

        let err = extract_vth(&set, &single_step_config()).unwrap_err();
        match err {
            Error::TraceNotFound { requested, available } => {
                assert_eq!(requested.len(), DRAIN_CURRENT_CANDIDATES.len());
                assert_eq!(available, vec!["V(v_g_d)", "I(R1)"]);
            }
            other => panic!("expected TraceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_voltage_trace() {
        let mut set = TraceSet::new();
        set.insert(Trace::new(
            "Ix(xu1:D)",
            TraceKind::Current,
            vec![vec![0.0, 1e-3]],
        ));

        let err = extract_vth(&set, &single_step_config()).unwrap_err();
        assert!(matches!(err, Error::TraceNotFound { .. }));
    }

    #[test]
    fn test_empty_sweep_values_use_step_zero() {
        let set = single_step_set("Ix(xu1:D)");
        let cfg = VthConfig {
            target_temperature_c: 9000.0,
            sweep_values_c: vec![],
            ..VthConfig::default()
        };
        let result = extract_vth(&set, &cfg).expect("extraction failed");
        assert_eq!(result.threshold_volts, 2.0);
    }

    #[test]
    fn test_step_beyond_recorded_waveforms() {
        // default 24-value sweep selects step 8, but only one step exists
        let set = single_step_set("Ix(xu1:D)");
        let err = extract_vth(&set, &VthConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::WaveformUnavailable { step: 8, num_steps: 1, .. }
        ));
    }

    #[test]
    fn test_default_config() {
        let cfg = VthConfig::default();
        assert_eq!(cfg.target_temperature_c, 25.0);
        assert_eq!(cfg.target_current_a, 1e-3);
        assert_eq!(cfg.sweep_values_c.len(), 24);
    }
}
