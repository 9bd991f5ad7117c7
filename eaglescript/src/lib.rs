//! eaglescript - Eagle PCB script generation
//!
//! Model a board as signals (routed traces) and footprints (placed parts),
//! then write it out as an Eagle `.scr` script that draws the wires and
//! places the parts.
//!
//! # Quick Start
//!
//! ```no_run
//! use eaglescript::prelude::*;
//! use std::f64::consts::FRAC_PI_2;
//!
//! let mut board = Board::new(BoardOptions::default());
//! let mut ids = Vec::new();
//! for y in [0.0, 1.0, 2.0] {
//!     let mut signal = board.new_signal(0.254, 1, 2)?;
//!     signal.add(0.0, y).add(10.0, y);
//!     ids.push(signal.id());
//!     board.add(signal)?;
//! }
//!
//! // Turn the bundle left, keeping 1mm between traces, and run 5mm further.
//! board.group(&ids)?.elbow(0.0, FRAC_PI_2, 5.0, None, 2)?;
//!
//! let r1 = FootprintKind::new("R0805", "rcl");
//! board.add(r1.place("R1", Orientation::rotated(90.0), (12.0, 3.0)))?;
//! board.draw()?;
//! # Ok::<(), ScriptError>(())
//! ```
//!
//! # Features
//!
//! - **Signals**: absolute and polar vertex appends, `LAYER`/`WIRE` output
//! - **Bundles**: bend parallel traces together while changing spacing
//! - **Descriptions**: build boards from JSON documents
//! - **Checking**: read generated scripts back and summarize them

pub mod board;
pub mod core;
pub mod description;
pub mod footprint;
pub mod geometry;
pub mod group;
pub mod script;
pub mod signal;

// Re-export main types
pub use board::{Board, BoardItem, BoardOptions, DEFAULT_OUTPUT};
pub use crate::core::{EagleScriptCore, RenderOptions, RenderResult, ScriptError};
pub use description::BoardDescription;
pub use footprint::{Footprint, FootprintKind, Orientation};
pub use geometry::{distance, distance_theta, project, Point};
pub use group::SignalGroup;
pub use script::{parse_script, ScriptCommand, ScriptParseError, ScriptSummary};
pub use signal::{Bend, Layer, Signal, SignalId, SignalIds, Vertex};

/// Build the board described by a JSON file (convenience wrapper).
pub fn load_board(path: &std::path::Path) -> Result<Board, ScriptError> {
    BoardDescription::from_path(path)?.build()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Bend, Board, BoardOptions, Footprint, FootprintKind, Layer, Orientation, Point,
        ScriptError, Signal, SignalGroup, SignalId, SignalIds,
    };
}
