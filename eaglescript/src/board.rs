//! Board: the signals and footprints of one generated script.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::core::ScriptError;
use crate::footprint::Footprint;
use crate::group::SignalGroup;
use crate::script::{self, ScriptCommand};
use crate::signal::{Bend, Layer, Signal, SignalId, SignalIds};

/// Default script file, written next to the caller.
pub const DEFAULT_OUTPUT: &str = "generated_PCB.scr";

/// Options for a board.
#[derive(Clone, Debug)]
pub struct BoardOptions {
    /// Script file written by `Board::draw`
    pub output: PathBuf,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Anything that can be added to a board.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardItem {
    Signal(Signal),
    Footprint(Footprint),
}

impl From<Signal> for BoardItem {
    fn from(signal: Signal) -> Self {
        BoardItem::Signal(signal)
    }
}

impl From<Footprint> for BoardItem {
    fn from(footprint: Footprint) -> Self {
        BoardItem::Footprint(footprint)
    }
}

/// A PCB under construction.
///
/// Populate it with `add`, then write the script once with `draw`. Signals
/// are drawn before footprints, each in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub options: BoardOptions,
    signals: Vec<Signal>,
    footprints: Vec<Footprint>,
    ids: SignalIds,
}

impl Board {
    pub fn new(options: BoardOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Next signal id for this board.
    pub fn allocate_id(&mut self) -> Result<SignalId, ScriptError> {
        self.ids.next_id()
    }

    /// Create a signal with a board-scoped id. The signal is not added.
    pub fn new_signal(&mut self, width: f64, layer: i64, bend: i64) -> Result<Signal, ScriptError> {
        let layer = Layer::try_from(layer)?;
        let bend = Bend::try_from(bend)?;
        let id = self.allocate_id()?;
        tracing::debug!("New signal RTE{} on layer {} (width {}mm)", id, layer, width);
        Ok(Signal::new(id, width, layer, bend))
    }

    pub fn add(&mut self, item: impl Into<BoardItem>) -> Result<(), ScriptError> {
        match item.into() {
            BoardItem::Signal(signal) => {
                if self.signal(signal.id()).is_some() {
                    return Err(ScriptError::DuplicateSignal(signal.id()));
                }
                self.ids.reserve(signal.id())?;
                self.signals.push(signal);
            }
            BoardItem::Footprint(footprint) => {
                footprint.validate()?;
                if self.footprint(&footprint.name).is_some() {
                    return Err(ScriptError::DuplicateFootprint(footprint.name));
                }
                self.footprints.push(footprint);
            }
        }
        Ok(())
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn footprints(&self) -> &[Footprint] {
        &self.footprints
    }

    pub fn signal(&self, id: SignalId) -> Option<&Signal> {
        self.signals.iter().find(|s| s.id() == id)
    }

    pub fn signal_mut(&mut self, id: SignalId) -> Option<&mut Signal> {
        self.signals.iter_mut().find(|s| s.id() == id)
    }

    pub fn footprint(&self, name: &str) -> Option<&Footprint> {
        self.footprints.iter().find(|f| f.name == name)
    }

    /// Borrow the given signals as a bundle, in the order listed.
    pub fn group(&mut self, ids: &[SignalId]) -> Result<SignalGroup<'_>, ScriptError> {
        let mut available: HashMap<SignalId, &mut Signal> =
            self.signals.iter_mut().map(|s| (s.id(), s)).collect();
        let mut taken = HashSet::new();
        let mut members = Vec::with_capacity(ids.len());

        for &id in ids {
            match available.remove(&id) {
                Some(signal) => {
                    taken.insert(id);
                    members.push(signal);
                }
                None if taken.contains(&id) => return Err(ScriptError::DuplicateSignal(id)),
                None => return Err(ScriptError::UnknownSignal(format!("RTE{}", id))),
            }
        }
        Ok(SignalGroup::new(members))
    }

    pub fn commands(&self) -> Vec<ScriptCommand> {
        let mut commands: Vec<ScriptCommand> =
            self.signals.iter().flat_map(|s| s.commands()).collect();
        commands.extend(self.footprints.iter().flat_map(|f| f.commands()));
        commands
    }

    /// Script text for the whole board.
    pub fn render(&self) -> String {
        script::render(&self.commands())
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), ScriptError> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Write the script to `options.output`, replacing any existing file.
    pub fn draw(&self) -> Result<PathBuf, ScriptError> {
        let path = self.options.output.clone();
        let file = File::create(&path)?;
        self.write_to(BufWriter::new(file))?;
        tracing::info!(
            "Wrote {} signals and {} footprints to {}",
            self.signals.len(),
            self.footprints.len(),
            path.display()
        );
        Ok(path)
    }
}
