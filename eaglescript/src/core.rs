//! Core rendering logic shared by the library API and the CLI.

use std::path::{Path, PathBuf};

use crate::board::DEFAULT_OUTPUT;
use crate::description::BoardDescription;
use crate::script::{parse_script, ScriptParseError, ScriptSummary};
use crate::signal::SignalId;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Invalid layer `{0}`: expected an integer from 1 to 255")]
    InvalidLayer(String),
    #[error("Invalid wire bend {0}: expected 0-7")]
    InvalidBend(i64),
    #[error("Invalid wire bend `{0}`: expected an integer")]
    InvalidBendText(String),
    #[error("Invalid orientation `{0}`: expected R<deg> or MR<deg>")]
    InvalidOrientation(String),
    #[error("Final spacing needs {expected} entries, got {found}")]
    SpacingMismatch { expected: usize, found: usize },
    #[error("Member index {index} out of range for a group of {len}")]
    PivotOutOfRange { index: usize, len: usize },
    #[error("Bend from {theta_i} to {theta_f} rad cannot reach the requested spacing")]
    DegenerateBend { theta_i: f64, theta_f: f64 },
    #[error("Signal RTE{0} has no vertices")]
    EmptySignal(SignalId),
    #[error("Invalid footprint {field} `{value}`: must be non-empty without whitespace, quotes, `@` or `;`")]
    InvalidFootprintText { field: &'static str, value: String },
    #[error("Footprint `{0}` is already on the board")]
    DuplicateFootprint(String),
    #[error("Signal RTE{0} is already on the board")]
    DuplicateSignal(SignalId),
    #[error("Signal id space exhausted at RTE{0}")]
    IdsExhausted(SignalId),
    #[error("Signal name `{0}` is used twice")]
    DuplicateSignalName(String),
    #[error("Unknown signal `{0}`")]
    UnknownSignal(String),
    #[error("Board description error: {0}")]
    Description(#[from] serde_json::Error),
    #[error("Script error: {0}")]
    Script(#[from] ScriptParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options for a render run (CLI or library).
#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Overrides the description's output path
    pub output: Option<PathBuf>,
    /// Build and render without writing a file
    pub dry_run: bool,
}

/// Outcome of rendering one board description.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub description: PathBuf,
    pub output: PathBuf,
    pub script: String,
    pub summary: ScriptSummary,
}

/// Render and check entry points used by both library callers and the CLI.
pub struct EagleScriptCore;

impl EagleScriptCore {
    /// Build the board described by a JSON file and write its script.
    ///
    /// A relative output path is resolved against the description's
    /// directory.
    pub fn render(path: &Path, options: RenderOptions) -> Result<RenderResult, ScriptError> {
        let description = BoardDescription::from_path(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        let output = match (&options.output, &description.output) {
            (Some(output), _) => output.clone(),
            (None, Some(output)) => base.join(output),
            (None, None) => base.join(DEFAULT_OUTPUT),
        };

        let mut board = description.build()?;
        board.options.output = output.clone();

        let script = board.render();
        let commands = parse_script(&script)?;
        if !options.dry_run {
            board.draw()?;
        }

        Ok(RenderResult {
            description: path.to_path_buf(),
            output,
            summary: ScriptSummary::from_commands(&commands),
            script,
        })
    }

    /// Read a script back and summarize it.
    pub fn check(path: &Path) -> Result<ScriptSummary, ScriptError> {
        let text = std::fs::read_to_string(path)?;
        let commands = parse_script(&text)?;
        tracing::debug!("Read {} statements from {}", commands.len(), path.display());
        Ok(ScriptSummary::from_commands(&commands))
    }
}
