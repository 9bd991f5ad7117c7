//! Declarative board descriptions
//!
//! A JSON document listing signals, the routing operations applied to them
//! in order, and footprint placements. Angles are in radians.
//!
//! ```json
//! {
//!   "output": "bundle.scr",
//!   "defaults": { "width": 0.254, "layer": 1, "bend": 2 },
//!   "signals": [ { "name": "a", "vertices": [[0, 0], [10, 0]] } ],
//!   "operations": [ { "op": "r_theta", "signal": "a", "r": 5, "theta": 0 } ],
//!   "footprints": [
//!     { "name": "R1", "package": "R0805", "library": "rcl", "orientation": "R90", "at": [5, 5] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::board::{Board, BoardOptions};
use crate::core::ScriptError;
use crate::footprint::{FootprintKind, Orientation};
use crate::geometry::Point;
use crate::signal::{Bend, Layer, Signal, SignalId};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub defaults: SignalDefaults,
    #[serde(default)]
    pub signals: Vec<SignalDescription>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default)]
    pub footprints: Vec<FootprintDescription>,
}

/// Fallbacks for signal fields left out of a description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignalDefaults {
    pub width: f64,
    pub layer: Layer,
    pub bend: Bend,
}

impl Default for SignalDefaults {
    fn default() -> Self {
        Self {
            width: 0.254,
            layer: Layer::TOP,
            bend: Bend::STRAIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalDescription {
    pub name: String,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub layer: Option<Layer>,
    #[serde(default)]
    pub bend: Option<Bend>,
    #[serde(default)]
    pub vertices: Vec<Point>,
}

/// One routing step, applied in document order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Operation {
    Add {
        signal: String,
        at: Point,
    },
    RTheta {
        signal: String,
        r: f64,
        theta: f64,
    },
    Elbow {
        signals: Vec<String>,
        theta_i: f64,
        theta_f: f64,
        #[serde(default)]
        distance: f64,
        #[serde(default)]
        final_spacing: Option<Vec<f64>>,
        #[serde(default)]
        fixed: usize,
    },
    GroupedRTheta {
        signals: Vec<String>,
        r: f64,
        theta: f64,
        #[serde(default)]
        center: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FootprintDescription {
    pub name: String,
    pub package: String,
    pub library: String,
    #[serde(default)]
    pub orientation: Orientation,
    pub at: Point,
}

impl FromStr for BoardDescription {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

impl BoardDescription {
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Build the board: create signals in listed order, apply the
    /// operations, then place footprints.
    pub fn build(&self) -> Result<Board, ScriptError> {
        let mut options = BoardOptions::default();
        if let Some(output) = &self.output {
            options.output = output.clone();
        }
        let mut board = Board::new(options);

        let mut names: HashMap<&str, SignalId> = HashMap::new();
        for desc in &self.signals {
            let mut signal = Signal::new(
                board.allocate_id()?,
                desc.width.unwrap_or(self.defaults.width),
                desc.layer.unwrap_or(self.defaults.layer),
                desc.bend.unwrap_or(self.defaults.bend),
            );
            for vertex in &desc.vertices {
                signal.add_point(*vertex);
            }
            if names.insert(desc.name.as_str(), signal.id()).is_some() {
                return Err(ScriptError::DuplicateSignalName(desc.name.clone()));
            }
            board.add(signal)?;
        }

        for operation in &self.operations {
            apply(&mut board, &names, operation)?;
        }

        for fp in &self.footprints {
            let kind = FootprintKind::new(fp.package.as_str(), fp.library.as_str());
            board.add(kind.place(fp.name.as_str(), fp.orientation, fp.at))?;
        }

        tracing::debug!(
            "Built board: {} signals, {} operations, {} footprints",
            self.signals.len(),
            self.operations.len(),
            self.footprints.len()
        );
        Ok(board)
    }
}

fn resolve(names: &HashMap<&str, SignalId>, name: &str) -> Result<SignalId, ScriptError> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| ScriptError::UnknownSignal(name.to_string()))
}

fn resolve_all(
    names: &HashMap<&str, SignalId>,
    signals: &[String],
) -> Result<Vec<SignalId>, ScriptError> {
    signals.iter().map(|name| resolve(names, name)).collect()
}

fn signal_mut<'b>(
    board: &'b mut Board,
    names: &HashMap<&str, SignalId>,
    name: &str,
) -> Result<&'b mut Signal, ScriptError> {
    let id = resolve(names, name)?;
    board
        .signal_mut(id)
        .ok_or_else(|| ScriptError::UnknownSignal(name.to_string()))
}

fn apply(
    board: &mut Board,
    names: &HashMap<&str, SignalId>,
    operation: &Operation,
) -> Result<(), ScriptError> {
    match operation {
        Operation::Add { signal, at } => {
            signal_mut(board, names, signal)?.add_point(*at);
        }
        Operation::RTheta { signal, r, theta } => {
            signal_mut(board, names, signal)?.r_theta(*r, *theta)?;
        }
        Operation::Elbow {
            signals,
            theta_i,
            theta_f,
            distance,
            final_spacing,
            fixed,
        } => {
            let ids = resolve_all(names, signals)?;
            board.group(&ids)?.elbow(
                *theta_i,
                *theta_f,
                *distance,
                final_spacing.as_deref(),
                *fixed,
            )?;
        }
        Operation::GroupedRTheta {
            signals,
            r,
            theta,
            center,
        } => {
            let ids = resolve_all(names, signals)?;
            board.group(&ids)?.grouped_r_theta(*r, *theta, *center)?;
        }
    }
    Ok(())
}
