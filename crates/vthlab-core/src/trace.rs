//! Named trace storage with one waveform per sweep step.

use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Signal kind recorded by the simulator for a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Voltage,
    Current,
    Time,
    Frequency,
    Other,
}

impl TraceKind {
    /// Map a rawfile variable type string onto a kind.
    ///
    /// Simulators disagree on current naming (`current`, `device_current`,
    /// `subckt_current`), so anything containing "current" counts.
    pub fn from_variable_type(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "voltage" => TraceKind::Voltage,
            "time" => TraceKind::Time,
            "frequency" => TraceKind::Frequency,
            _ if lower.contains("current") => TraceKind::Current,
            _ => TraceKind::Other,
        }
    }
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TraceKind::Voltage => "voltage",
            TraceKind::Current => "current",
            TraceKind::Time => "time",
            TraceKind::Frequency => "frequency",
            TraceKind::Other => "other",
        };
        f.pad(s)
    }
}

/// One named signal with one waveform per sweep step.
#[derive(Debug, Clone)]
pub struct Trace {
    name: String,
    kind: TraceKind,
    steps: Vec<Vec<f64>>,
}

impl Trace {
    /// Create a trace from per-step waveforms.
    pub fn new(name: impl Into<String>, kind: TraceKind, steps: Vec<Vec<f64>>) -> Self {
        Self {
            name: name.into(),
            kind,
            steps,
        }
    }

    /// Name of the trace as recorded by the simulator.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signal kind of the trace.
    pub fn kind(&self) -> TraceKind {
        self.kind
    }

    /// Number of sweep steps recorded for this trace.
    pub fn num_steps(&self) -> usize {
        self.steps.len()
    }

    /// Sample count of one step's waveform (steps share the sample count).
    pub fn num_points(&self) -> usize {
        self.steps.first().map(Vec::len).unwrap_or(0)
    }

    /// Samples of this trace at one sweep step.
    ///
    /// Fails when the step index is out of range or the recorded waveform is
    /// empty and therefore unusable.
    pub fn wave(&self, step: usize) -> Result<&[f64]> {
        match self.steps.get(step) {
            Some(wave) if !wave.is_empty() => Ok(wave),
            _ => Err(Error::WaveformUnavailable {
                trace: self.name.clone(),
                step,
                num_steps: self.steps.len(),
            }),
        }
    }
}

/// Insertion-ordered collection of the named traces from one simulation run.
///
/// Order follows the rawfile's variable listing so diagnostic output is
/// stable across reads of the same file.
#[derive(Debug, Clone, Default)]
pub struct TraceSet {
    traces: IndexMap<String, Trace>,
}

impl TraceSet {
    /// Create an empty trace set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a trace, replacing any existing trace with the same name.
    pub fn insert(&mut self, trace: Trace) {
        self.traces.insert(trace.name().to_string(), trace);
    }

    /// Exact-name lookup.
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.get(name)
    }

    /// Case-insensitive lookup; the first match in insertion order wins.
    pub fn trace_ignore_case(&self, name: &str) -> Option<&Trace> {
        self.traces
            .get(name)
            .or_else(|| self.traces.values().find(|t| t.name().eq_ignore_ascii_case(name)))
    }

    /// All trace names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.traces.keys().cloned().collect()
    }

    /// Number of traces in the set.
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    /// Whether the set holds no traces.
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Iterate traces in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Trace> {
        self.traces.values()
    }
}
