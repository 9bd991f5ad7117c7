//! Footprint placement
//!
//! A `FootprintKind` names a package in a library; `Footprint` is one placed
//! instance of it with a reference designator, orientation and location.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::ScriptError;
use crate::geometry::Point;
use crate::script::ScriptCommand;

/// Rotation in degrees plus an optional mirror, written `R90` or `MR90`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Orientation {
    pub rotation: f64,
    pub mirror: bool,
}

impl Orientation {
    pub fn new(rotation: f64, mirror: bool) -> Self {
        Self { rotation, mirror }
    }

    pub fn rotated(rotation: f64) -> Self {
        Self::new(rotation, false)
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mirror {
            f.write_str("M")?;
        }
        write!(f, "R{}", self.rotation)
    }
}

impl FromStr for Orientation {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScriptError::InvalidOrientation(s.to_string());
        let text = s.trim();
        let (mirror, rest) = match text.strip_prefix('M') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let rotation = rest
            .strip_prefix('R')
            .ok_or_else(invalid)?
            .parse::<f64>()
            .map_err(|_| invalid())?;
        if !rotation.is_finite() {
            return Err(invalid());
        }
        Ok(Orientation { rotation, mirror })
    }
}

impl TryFrom<String> for Orientation {
    type Error = ScriptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Orientation> for String {
    fn from(o: Orientation) -> Self {
        o.to_string()
    }
}

/// A package from a library; places any number of named footprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FootprintKind {
    pub package: String,
    pub library: String,
}

impl FootprintKind {
    pub fn new(package: impl Into<String>, library: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            library: library.into(),
        }
    }

    pub fn place(
        &self,
        name: impl Into<String>,
        orientation: Orientation,
        location: impl Into<Point>,
    ) -> Footprint {
        Footprint {
            name: name.into(),
            package: self.package.clone(),
            library: self.library.clone(),
            orientation,
            location: location.into(),
        }
    }
}

/// A placed component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub name: String,
    pub package: String,
    pub library: String,
    pub orientation: Orientation,
    pub location: Point,
}

impl Footprint {
    /// Check that the name, package and library each survive as a single
    /// script token.
    pub fn validate(&self) -> Result<(), ScriptError> {
        check_token("name", &self.name)?;
        check_token("package", &self.package)?;
        check_token("library", &self.library)
    }

    pub fn kind(&self) -> FootprintKind {
        FootprintKind::new(self.package.clone(), self.library.clone())
    }

    pub fn commands(&self) -> [ScriptCommand; 2] {
        [
            ScriptCommand::Add {
                name: self.name.clone(),
                package: self.package.clone(),
                library: self.library.clone(),
                orientation: self.orientation,
            },
            ScriptCommand::Move {
                name: self.name.clone(),
                at: self.location,
            },
        ]
    }

    /// `ADD` then `MOVE` statements for this footprint.
    pub fn place(&self) -> String {
        crate::script::render(&self.commands())
    }
}

fn check_token(field: &'static str, value: &str) -> Result<(), ScriptError> {
    let bad = |c: char| c.is_whitespace() || matches!(c, '\'' | '@' | ';');
    if value.is_empty() || value.contains(bad) {
        return Err(ScriptError::InvalidFootprintText {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
