//! Rawfile header fields (Title/Plotname/Flags/Variables).

use vthlab_core::TraceKind;

use crate::error::{RawError, Result};

/// One entry of the `Variables:` block.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Zero-based position in each data point.
    pub index: usize,
    /// Signal name as recorded by the simulator.
    pub name: String,
    /// Signal kind derived from the variable type string.
    pub kind: TraceKind,
}

impl Variable {
    /// Parse one `\t<idx>\t<name>\t<type>` line of the Variables block.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let index = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| RawError::Malformed {
                line: line_no,
                message: format!("invalid variable line '{}'", line.trim()),
            })?;
        let name = fields
            .next()
            .ok_or_else(|| RawError::Malformed {
                line: line_no,
                message: "variable line missing a name".to_string(),
            })?
            .to_string();
        let kind = TraceKind::from_variable_type(fields.next().unwrap_or(""));
        Ok(Variable { index, name, kind })
    }
}

/// Contents of the `Flags:` header line. Unrecognized flag words are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub real: bool,
    pub complex: bool,
    pub stepped: bool,
    pub double: bool,
}

impl Flags {
    /// Parse the whitespace-separated flag words.
    pub fn parse(s: &str) -> Self {
        let mut flags = Flags::default();
        for word in s.split_whitespace() {
            match word.to_ascii_lowercase().as_str() {
                "real" => flags.real = true,
                "complex" => flags.complex = true,
                "stepped" => flags.stepped = true,
                "double" => flags.double = true,
                _ => {}
            }
        }
        flags
    }
}

/// Parsed header of one plot block.
#[derive(Debug, Clone, Default)]
pub struct Header {
    pub title: String,
    pub date: String,
    pub plotname: String,
    pub flags: Flags,
    pub num_variables: usize,
    pub num_points: usize,
    pub variables: Vec<Variable>,
}
