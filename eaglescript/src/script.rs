//! Eagle script statements
//!
//! The subset of Eagle's script language this crate emits, plus a reader for
//! the same subset so generated scripts can be checked without Eagle.
//!
//! Statement forms, one per line:
//! - `LAYER <int>`
//! - `SET WIRE_BEND <int>;`
//! - `WIRE 'RTE<id>' (<x1> <y1>) <width>mm (<x2> <y2>)`
//! - `ADD '<name>' <package>@<library> <orientation>`
//! - `MOVE <name> <x> <y>`

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

use crate::footprint::Orientation;
use crate::geometry::{distance, Point};
use crate::signal::{Bend, Layer, SignalId};

#[derive(Debug, Error)]
pub enum ScriptParseError {
    #[error("line {line}: unknown statement `{text}`")]
    UnknownStatement { line: usize, text: String },
    #[error("line {line}: malformed {statement} statement: {reason}")]
    Malformed {
        line: usize,
        statement: &'static str,
        reason: String,
    },
}

/// One script statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Layer(Layer),
    WireBend(Bend),
    Wire {
        signal: SignalId,
        width: f64,
        from: Point,
        to: Point,
    },
    Add {
        name: String,
        package: String,
        library: String,
        orientation: Orientation,
    },
    Move {
        name: String,
        at: Point,
    },
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Layer(layer) => write!(f, "LAYER {}", layer),
            ScriptCommand::WireBend(bend) => write!(f, "SET WIRE_BEND {};", bend),
            ScriptCommand::Wire {
                signal,
                width,
                from,
                to,
            } => write!(f, "WIRE 'RTE{}' {} {}mm {}", signal, from, width, to),
            ScriptCommand::Add {
                name,
                package,
                library,
                orientation,
            } => write!(f, "ADD '{}' {}@{} {}", name, package, library, orientation),
            ScriptCommand::Move { name, at } => write!(f, "MOVE {} {} {}", name, at.x, at.y),
        }
    }
}

/// Render statements as script text, one per line.
pub fn render(commands: &[ScriptCommand]) -> String {
    let mut out = String::new();
    for command in commands {
        if let ScriptCommand::Wire { signal, from, to, .. } = command {
            if from == to {
                tracing::warn!("Zero-length wire on signal RTE{} at {}", signal, from);
            }
        }
        out.push_str(&command.to_string());
        out.push('\n');
    }
    out
}

/// Read script text back into statements.
///
/// Blank lines and `#` comments are skipped.
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, ScriptParseError> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        commands.push(parse_line(index + 1, line)?);
    }
    Ok(commands)
}

fn parse_line(line: usize, text: &str) -> Result<ScriptCommand, ScriptParseError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let malformed = |statement: &'static str, reason: &str| ScriptParseError::Malformed {
        line,
        statement,
        reason: reason.to_string(),
    };

    match tokens.first().map(|t| t.to_ascii_uppercase()).as_deref() {
        Some("LAYER") => {
            let [_, layer] = tokens[..] else {
                return Err(malformed("LAYER", "expected `LAYER <int>`"));
            };
            let layer = layer
                .parse::<Layer>()
                .map_err(|e| malformed("LAYER", &e.to_string()))?;
            Ok(ScriptCommand::Layer(layer))
        }
        Some("SET") => {
            let [_, setting, value] = tokens[..] else {
                return Err(malformed("SET", "expected `SET WIRE_BEND <int>;`"));
            };
            if !setting.eq_ignore_ascii_case("WIRE_BEND") {
                return Err(malformed("SET", &format!("unsupported setting {}", setting)));
            }
            let value = value
                .strip_suffix(';')
                .ok_or_else(|| malformed("SET", "missing `;`"))?;
            let bend = value
                .parse::<Bend>()
                .map_err(|e| malformed("SET", &e.to_string()))?;
            Ok(ScriptCommand::WireBend(bend))
        }
        Some("WIRE") => {
            let [_, name, x1, y1, width, x2, y2] = tokens[..] else {
                return Err(malformed(
                    "WIRE",
                    "expected `WIRE 'RTE<id>' (<x> <y>) <width>mm (<x> <y>)`",
                ));
            };
            let signal = unquote(name)
                .and_then(|n| n.strip_prefix("RTE"))
                .and_then(|id| id.parse::<u32>().ok())
                .map(SignalId)
                .ok_or_else(|| malformed("WIRE", &format!("bad signal name {}", name)))?;
            let width = width
                .strip_suffix("mm")
                .and_then(|w| w.parse::<f64>().ok())
                .ok_or_else(|| malformed("WIRE", &format!("bad width {}", width)))?;
            let from = parse_coord(x1, y1).ok_or_else(|| malformed("WIRE", "bad start point"))?;
            let to = parse_coord(x2, y2).ok_or_else(|| malformed("WIRE", "bad end point"))?;
            Ok(ScriptCommand::Wire {
                signal,
                width,
                from,
                to,
            })
        }
        Some("ADD") => {
            let [_, name, device, orientation] = tokens[..] else {
                return Err(malformed(
                    "ADD",
                    "expected `ADD '<name>' <package>@<library> <orientation>`",
                ));
            };
            let name = unquote(name).ok_or_else(|| malformed("ADD", "name must be quoted"))?;
            let (package, library) = device
                .split_once('@')
                .ok_or_else(|| malformed("ADD", "expected <package>@<library>"))?;
            let orientation = orientation
                .parse::<Orientation>()
                .map_err(|e| malformed("ADD", &e.to_string()))?;
            Ok(ScriptCommand::Add {
                name: name.to_string(),
                package: package.to_string(),
                library: library.to_string(),
                orientation,
            })
        }
        Some("MOVE") => {
            let [_, name, x, y] = tokens[..] else {
                return Err(malformed("MOVE", "expected `MOVE <name> <x> <y>`"));
            };
            let x = x.parse::<f64>().map_err(|_| malformed("MOVE", "bad x"))?;
            let y = y.parse::<f64>().map_err(|_| malformed("MOVE", "bad y"))?;
            Ok(ScriptCommand::Move {
                name: name.to_string(),
                at: Point::new(x, y),
            })
        }
        _ => Err(ScriptParseError::UnknownStatement {
            line,
            text: text.to_string(),
        }),
    }
}

fn unquote(token: &str) -> Option<&str> {
    token.strip_prefix('\'')?.strip_suffix('\'')
}

fn parse_coord(x: &str, y: &str) -> Option<Point> {
    let x = x.strip_prefix('(')?.parse().ok()?;
    let y = y.strip_suffix(')')?.parse().ok()?;
    Some(Point::new(x, y))
}

/// Counts over a parsed script.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScriptSummary {
    pub statements: usize,
    pub wires: usize,
    pub signals: usize,
    pub layers: Vec<u8>,
    pub footprints: usize,
    pub moves: usize,
    /// Sum of wire lengths in millimeters
    pub wire_length: f64,
}

impl ScriptSummary {
    pub fn from_commands(commands: &[ScriptCommand]) -> Self {
        let mut summary = ScriptSummary {
            statements: commands.len(),
            ..Default::default()
        };
        let mut signals = BTreeSet::new();
        let mut layers = BTreeSet::new();

        for command in commands {
            match command {
                ScriptCommand::Layer(layer) => {
                    layers.insert(layer.number());
                }
                ScriptCommand::WireBend(_) => {}
                ScriptCommand::Wire {
                    signal, from, to, ..
                } => {
                    summary.wires += 1;
                    summary.wire_length += distance(*from, *to);
                    signals.insert(*signal);
                }
                ScriptCommand::Add { .. } => summary.footprints += 1,
                ScriptCommand::Move { .. } => summary.moves += 1,
            }
        }

        summary.signals = signals.len();
        summary.layers = layers.into_iter().collect();
        summary
    }
}
