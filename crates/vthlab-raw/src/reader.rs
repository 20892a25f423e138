//! Rawfile reading: header scan, ASCII and binary data sections, step splitting.

use std::path::Path;

use vthlab_core::{Trace, TraceSet};

use crate::error::{RawError, Result};
use crate::header::{Flags, Header, Variable};

/// A fully ingested rawfile.
#[derive(Debug, Clone)]
pub struct RawPlot {
    /// Title header line.
    pub title: String,
    /// Date header line.
    pub date: String,
    /// Plotname of the first plot block.
    pub plotname: String,
    /// Total number of sweep steps across all plot blocks.
    pub num_steps: usize,
    /// Trace data keyed by variable name, in rawfile order.
    pub traces: TraceSet,
}

/// Read a rawfile from disk.
pub fn read_raw(path: &Path) -> Result<RawPlot> {
    let bytes = std::fs::read(path)?;
    parse_raw(&bytes)
}

/// Parse rawfile bytes.
///
/// Accepts UTF-8/ASCII as written by ngspice and UTF-16LE as written by
/// LTspice, with `Values:` (ASCII) or `Binary:` (little-endian) data
/// sections. A file may hold several concatenated plot blocks; a block
/// whose flags contain `stepped` is split at abscissa restarts. Complex
/// (AC) data is rejected rather than misparsed.
pub fn parse_raw(bytes: &[u8]) -> Result<RawPlot> {
    let mut cursor = Cursor::new(bytes);
    if cursor.wide() {
        log::debug!("rawfile header is UTF-16LE encoded");
    }

    let mut blocks = Vec::new();
    while let Some((header, body)) = parse_header(&mut cursor)? {
        if header.flags.complex {
            return Err(RawError::Unsupported(
                "complex (AC) rawfiles are not supported".to_string(),
            ));
        }
        let columns = match body {
            Body::Ascii => read_ascii_values(&mut cursor, &header)?,
            Body::Binary => read_binary_values(&mut cursor, &header)?,
        };
        blocks.push((header, columns));
    }
    assemble(blocks)
}

enum Body {
    Ascii,
    Binary,
}

/// Parse one plot block's header up to its data section marker.
///
/// Returns `None` at clean end of input. Unknown header keys (Command,
/// Options, Offset, ...) are ignored.
fn parse_header(cursor: &mut Cursor<'_>) -> Result<Option<(Header, Body)>> {
    let mut header = Header::default();
    let mut saw_field = false;

    while let Some(raw_line) = cursor.next_line() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = cursor.line();

        if let Some(rest) = strip_key(line, "Title:") {
            header.title = rest.to_string();
            saw_field = true;
        } else if let Some(rest) = strip_key(line, "Date:") {
            header.date = rest.to_string();
            saw_field = true;
        } else if let Some(rest) = strip_key(line, "Plotname:") {
            header.plotname = rest.to_string();
            saw_field = true;
        } else if let Some(rest) = strip_key(line, "Flags:") {
            header.flags = Flags::parse(rest);
            saw_field = true;
        } else if let Some(rest) = strip_key(line, "No. Variables:") {
            header.num_variables = parse_count(rest, line_no)?;
            saw_field = true;
        } else if let Some(rest) = strip_key(line, "No. Points:") {
            header.num_points = parse_count(rest, line_no)?;
            saw_field = true;
        } else if strip_key(line, "Variables:").is_some() {
            if header.num_variables == 0 {
                return Err(RawError::Malformed {
                    line: line_no,
                    message: "Variables section without a nonzero 'No. Variables' count"
                        .to_string(),
                });
            }
            for _ in 0..header.num_variables {
                let var_line_no = cursor.line() + 1;
                let var_line = cursor.next_line().ok_or_else(|| RawError::Malformed {
                    line: var_line_no,
                    message: "unexpected end of file in Variables section".to_string(),
                })?;
                header.variables.push(Variable::parse(&var_line, var_line_no)?);
            }
            saw_field = true;
        } else if strip_key(line, "Values:").is_some() {
            check_variables(&header, line_no)?;
            return Ok(Some((header, Body::Ascii)));
        } else if strip_key(line, "Binary:").is_some() {
            check_variables(&header, line_no)?;
            return Ok(Some((header, Body::Binary)));
        }
    }

    if saw_field {
        return Err(RawError::Malformed {
            line: cursor.line(),
            message: "header without a Values or Binary section".to_string(),
        });
    }
    Ok(None)
}

fn check_variables(header: &Header, line: usize) -> Result<()> {
    if header.variables.is_empty() || header.variables.len() != header.num_variables {
        return Err(RawError::Malformed {
            line,
            message: format!(
                "expected {} variables, found {}",
                header.num_variables,
                header.variables.len()
            ),
        });
    }
    Ok(())
}

/// Case-insensitive header key match; returns the trimmed remainder.
fn strip_key<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let head = line.get(..key.len())?;
    if head.eq_ignore_ascii_case(key) {
        Some(line[key.len()..].trim())
    } else {
        None
    }
}

fn parse_count(s: &str, line: usize) -> Result<usize> {
    s.split_whitespace()
        .next()
        .unwrap_or("")
        .parse()
        .map_err(|_| RawError::Malformed {
            line,
            message: format!("invalid count '{s}'"),
        })
}

/// Read an ASCII `Values:` section: per point, ` <index>\t<value>` for the
/// first variable and one indented value line per remaining variable.
fn read_ascii_values(cursor: &mut Cursor<'_>, header: &Header) -> Result<Vec<Vec<f64>>> {
    let n_vars = header.variables.len();
    let mut columns = vec![Vec::with_capacity(header.num_points); n_vars];

    for point in 0..header.num_points {
        for var in 0..n_vars {
            let line = next_data_line(cursor).ok_or_else(|| RawError::Malformed {
                line: cursor.line() + 1,
                message: format!("unexpected end of data at point {point}"),
            })?;
            let line_no = cursor.line();
            let mut fields = line.split_whitespace();

            if var == 0 {
                let index = fields.next().unwrap_or("");
                if index.parse::<usize>().is_err() {
                    return Err(RawError::Malformed {
                        line: line_no,
                        message: format!("invalid point index '{index}'"),
                    });
                }
            }

            let field = fields.next().ok_or_else(|| RawError::Malformed {
                line: line_no,
                message: "data line missing a value".to_string(),
            })?;
            let value: f64 = field.parse().map_err(|_| RawError::Malformed {
                line: line_no,
                message: format!("invalid number '{field}'"),
            })?;
            columns[var].push(value);
        }
    }
    Ok(columns)
}

fn next_data_line(cursor: &mut Cursor<'_>) -> Option<String> {
    while let Some(line) = cursor.next_line() {
        if !line.trim().is_empty() {
            return Some(line);
        }
    }
    None
}

/// Read a little-endian `Binary:` section.
///
/// Two point layouts exist: every variable as f64 (ngspice, and the LTspice
/// `double` flag), or the abscissa as f64 with all other variables packed
/// as f32 (LTspice default). The layout is chosen by matching the payload
/// size actually present against the point count.
fn read_binary_values(cursor: &mut Cursor<'_>, header: &Header) -> Result<Vec<Vec<f64>>> {
    let n_vars = header.variables.len();
    let n_points = header.num_points;
    let avail = cursor.remaining();
    let line = cursor.line();

    let full_size = n_points * 8 * n_vars;
    let packed_size = n_points * (8 + 4 * (n_vars - 1));

    let use_full = if header.flags.double {
        true
    } else if avail == packed_size {
        false
    } else if avail == full_size {
        true
    } else if avail > full_size {
        // further plot blocks follow; UTF-16 rawfiles pack non-axis data as f32
        !cursor.wide()
    } else if avail > packed_size {
        false
    } else {
        return Err(RawError::Malformed {
            line,
            message: format!("binary section holds {avail} bytes, expected {packed_size}"),
        });
    };

    let needed = if use_full { full_size } else { packed_size };
    if avail < needed {
        return Err(RawError::Malformed {
            line,
            message: format!("binary section holds {avail} bytes, expected {needed}"),
        });
    }

    let payload = cursor.take_bytes(needed);
    let mut columns = vec![Vec::with_capacity(n_points); n_vars];
    let mut offset = 0;
    for _ in 0..n_points {
        for (var, column) in columns.iter_mut().enumerate() {
            if use_full || var == 0 {
                let bytes: [u8; 8] = payload[offset..offset + 8].try_into().unwrap();
                column.push(f64::from_le_bytes(bytes));
                offset += 8;
            } else {
                let bytes: [u8; 4] = payload[offset..offset + 4].try_into().unwrap();
                column.push(f32::from_le_bytes(bytes) as f64);
                offset += 4;
            }
        }
    }
    Ok(columns)
}

/// Merge parsed plot blocks into one trace set.
///
/// Every block must list the same variables; each contributes one step per
/// abscissa restart (stepped flag) or one step total.
fn assemble(blocks: Vec<(Header, Vec<Vec<f64>>)>) -> Result<RawPlot> {
    let Some((first_header, _)) = blocks.first() else {
        return Err(RawError::Malformed {
            line: 1,
            message: "no plot data found".to_string(),
        });
    };
    let first_header = first_header.clone();

    for (header, _) in &blocks[1..] {
        let same = header.variables.len() == first_header.variables.len()
            && header
                .variables
                .iter()
                .zip(&first_header.variables)
                .all(|(a, b)| a.name == b.name);
        if !same {
            return Err(RawError::Unsupported(
                "plot blocks with differing variables".to_string(),
            ));
        }
    }

    let mut per_var_steps: Vec<Vec<Vec<f64>>> = vec![Vec::new(); first_header.variables.len()];
    for (header, columns) in &blocks {
        let starts = if header.flags.stepped {
            step_starts(&columns[0])
        } else {
            vec![0]
        };
        for (var, column) in columns.iter().enumerate() {
            for (si, &start) in starts.iter().enumerate() {
                let end = starts.get(si + 1).copied().unwrap_or(column.len());
                per_var_steps[var].push(column[start..end].to_vec());
            }
        }
    }

    let num_steps = per_var_steps.first().map(Vec::len).unwrap_or(0);
    let mut traces = TraceSet::new();
    for (var, steps) in first_header.variables.iter().zip(per_var_steps) {
        traces.insert(Trace::new(var.name.clone(), var.kind, steps));
    }

    log::debug!(
        "ingested rawfile '{}': {} traces, {} steps",
        first_header.plotname,
        traces.len(),
        num_steps
    );

    Ok(RawPlot {
        title: first_header.title,
        date: first_header.date,
        plotname: first_header.plotname,
        num_steps,
        traces,
    })
}

/// Start index of each sweep step.
///
/// A stepped plot concatenates every step's points; the abscissa restarts
/// against the established sweep direction at each boundary.
fn step_starts(axis: &[f64]) -> Vec<usize> {
    let mut starts = vec![0];

    let mut direction = 0.0;
    for pair in axis.windows(2) {
        let d = pair[1] - pair[0];
        if d != 0.0 {
            direction = d.signum();
            break;
        }
    }
    if direction == 0.0 {
        return starts;
    }

    for i in 1..axis.len() {
        let d = axis[i] - axis[i - 1];
        if d != 0.0 && d.signum() == -direction {
            starts.push(i);
        }
    }
    starts
}

/// Byte cursor that decodes text lines from UTF-8/ASCII or UTF-16LE input
/// while leaving binary payloads addressable by offset.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    wide: bool,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        // LTspice writes UTF-16LE: a BOM, or a NUL high byte on the first char
        let wide = bytes.len() >= 2
            && ((bytes[0] == 0xFF && bytes[1] == 0xFE) || (bytes[1] == 0 && bytes[0] != 0));
        let pos = if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
            2
        } else {
            0
        };
        Self {
            bytes,
            pos,
            line: 0,
            wide,
        }
    }

    fn wide(&self) -> bool {
        self.wide
    }

    /// 1-based number of the most recently read line.
    fn line(&self) -> usize {
        self.line
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take_bytes(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    /// Next text line without its terminator; `None` at end of input.
    fn next_line(&mut self) -> Option<String> {
        if self.pos >= self.bytes.len() {
            return None;
        }
        let mut out = String::new();
        if self.wide {
            while self.pos + 1 < self.bytes.len() {
                let unit = u16::from_le_bytes([self.bytes[self.pos], self.bytes[self.pos + 1]]);
                self.pos += 2;
                if unit == u16::from(b'\n') {
                    break;
                }
                if unit == u16::from(b'\r') {
                    continue;
                }
                out.push(char::from_u32(u32::from(unit)).unwrap_or('\u{FFFD}'));
            }
        } else {
            while self.pos < self.bytes.len() {
                let byte = self.bytes[self.pos];
                self.pos += 1;
                if byte == b'\n' {
                    break;
                }
                if byte == b'\r' {
                    continue;
                }
                out.push(char::from(byte));
            }
        }
        self.line += 1;
        Some(out)
    }
}
