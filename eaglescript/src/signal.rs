//! Signals (routed traces)
//!
//! A `Signal` is one electrical connection drawn as an ordered polyline. Its
//! vertices run from the origin of the trace to its destination; each pair of
//! consecutive vertices becomes one `WIRE` statement.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::ScriptError;
use crate::geometry::{distance, Point};
use crate::script::ScriptCommand;

/// Identifier embedded in wire names (`RTE<id>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SignalId(pub u32);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic signal id allocator.
///
/// Each board owns one, so ids are deterministic per board instance.
#[derive(Debug, Clone, Default)]
pub struct SignalIds {
    next: u32,
}

impl SignalIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after ids handed out elsewhere.
    pub fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Hand out the next id. `u32::MAX` is never handed out.
    pub fn next_id(&mut self) -> Result<SignalId, ScriptError> {
        let id = SignalId(self.next);
        self.next = successor(id)?;
        Ok(id)
    }

    /// Make sure future ids never collide with `id`.
    pub fn reserve(&mut self, id: SignalId) -> Result<(), ScriptError> {
        self.next = self.next.max(successor(id)?);
        Ok(())
    }
}

fn successor(id: SignalId) -> Result<u32, ScriptError> {
    id.0.checked_add(1).ok_or(ScriptError::IdsExhausted(id))
}

/// Copper layer number (Eagle numbers layers 1-255; 1 = Top, 16 = Bottom).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Layer(u8);

impl Layer {
    pub const TOP: Layer = Layer(1);
    pub const BOTTOM: Layer = Layer(16);

    pub fn number(&self) -> u8 {
        self.0
    }
}

impl Default for Layer {
    fn default() -> Self {
        Layer::TOP
    }
}

impl TryFrom<i64> for Layer {
    type Error = ScriptError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(n) if n >= 1 => Ok(Layer(n)),
            _ => Err(ScriptError::InvalidLayer(value.to_string())),
        }
    }
}

impl From<Layer> for i64 {
    fn from(layer: Layer) -> Self {
        i64::from(layer.0)
    }
}

impl FromStr for Layer {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ScriptError::InvalidLayer(s.to_string()))?;
        Layer::try_from(value)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wire bend style selected with `SET WIRE_BEND`, 0 through 7.
///
/// 2 draws a straight segment between the given points, which is what
/// explicit vertex lists want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Bend(u8);

impl Bend {
    pub const MAX: u8 = 7;
    pub const STRAIGHT: Bend = Bend(2);

    pub fn style(&self) -> u8 {
        self.0
    }
}

impl Default for Bend {
    fn default() -> Self {
        Bend::STRAIGHT
    }
}

impl TryFrom<i64> for Bend {
    type Error = ScriptError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Bend::MAX)).contains(&value) {
            Ok(Bend(value as u8))
        } else {
            Err(ScriptError::InvalidBend(value))
        }
    }
}

impl From<Bend> for i64 {
    fn from(bend: Bend) -> Self {
        i64::from(bend.0)
    }
}

impl FromStr for Bend {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ScriptError::InvalidBendText(s.to_string()))?;
        Bend::try_from(value)
    }
}

impl fmt::Display for Bend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bend point of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

impl From<Point> for Vertex {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.point().fmt(f)
    }
}

/// One routed electrical signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    id: SignalId,
    /// Trace width in millimeters
    pub width: f64,
    pub layer: Layer,
    pub bend: Bend,
    vertices: Vec<Vertex>,
}

impl Signal {
    pub fn new(id: SignalId, width: f64, layer: Layer, bend: Bend) -> Self {
        Self {
            id,
            width,
            layer,
            bend,
            vertices: Vec::new(),
        }
    }

    pub fn id(&self) -> SignalId {
        self.id
    }

    /// Append a vertex at absolute coordinates.
    pub fn add(&mut self, x: f64, y: f64) -> &mut Self {
        self.vertices.push(Vertex::new(x, y));
        self
    }

    pub fn add_point(&mut self, p: impl Into<Point>) -> &mut Self {
        let p = p.into();
        self.add(p.x, p.y)
    }

    /// Append a vertex offset from the last one by `r` along heading `theta`.
    pub fn r_theta(&mut self, r: f64, theta: f64) -> Result<&mut Self, ScriptError> {
        let last = self.last().ok_or(ScriptError::EmptySignal(self.id))?.point();
        let next = last + Point::polar(r, theta);
        self.vertices.push(next.into());
        Ok(self)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn last(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Vertex> {
        self.vertices.last_mut()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Total routed length of the polyline.
    pub fn length(&self) -> f64 {
        self.vertices
            .windows(2)
            .map(|pair| distance(&pair[0], &pair[1]))
            .sum()
    }

    /// Statements that draw this signal: layer select, bend style, then one
    /// wire per consecutive vertex pair.
    pub fn commands(&self) -> Vec<ScriptCommand> {
        let mut commands = Vec::with_capacity(self.vertices.len() + 1);
        commands.push(ScriptCommand::Layer(self.layer));
        commands.push(ScriptCommand::WireBend(self.bend));
        commands.extend(self.vertices.windows(2).map(|pair| ScriptCommand::Wire {
            signal: self.id,
            width: self.width,
            from: pair[0].point(),
            to: pair[1].point(),
        }));
        commands
    }

    /// Eagle script text for this signal, one statement per line.
    pub fn draw(&self) -> String {
        crate::script::render(&self.commands())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_3;

    fn signal() -> Signal {
        Signal::new(SignalId(7), 0.25, Layer::TOP, Bend::STRAIGHT)
    }

    fn wire_lines(script: &str) -> usize {
        script.lines().filter(|l| l.starts_with("WIRE")).count()
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = SignalIds::new();
        assert_eq!(ids.next_id().unwrap(), SignalId(0));
        assert_eq!(ids.next_id().unwrap(), SignalId(1));
        ids.reserve(SignalId(10)).unwrap();
        assert_eq!(ids.next_id().unwrap(), SignalId(11));
        ids.reserve(SignalId(3)).unwrap();
        assert_eq!(ids.next_id().unwrap(), SignalId(12));
    }

    #[test]
    fn test_ids_stop_at_the_end_of_the_range() {
        let mut ids = SignalIds::starting_at(u32::MAX - 1);
        assert_eq!(ids.next_id().unwrap(), SignalId(u32::MAX - 1));
        assert!(matches!(
            ids.next_id(),
            Err(ScriptError::IdsExhausted(SignalId(u32::MAX)))
        ));

        let mut ids = SignalIds::new();
        assert!(matches!(
            ids.reserve(SignalId(u32::MAX)),
            Err(ScriptError::IdsExhausted(_))
        ));
        assert_eq!(ids.next_id().unwrap(), SignalId(0));
    }

    #[test]
    fn test_layer_validation() {
        assert!(matches!(
            "x".parse::<Layer>(),
            Err(ScriptError::InvalidLayer(ref s)) if s == "x"
        ));
        assert!(Layer::try_from(0).is_err());
        assert!(Layer::try_from(256).is_err());
        assert_eq!("16".parse::<Layer>().unwrap(), Layer::BOTTOM);
    }

    #[test]
    fn test_bend_validation() {
        assert!(matches!(Bend::try_from(9), Err(ScriptError::InvalidBend(9))));
        assert!(matches!(Bend::try_from(-1), Err(ScriptError::InvalidBend(-1))));
        assert!(matches!("two".parse::<Bend>(), Err(ScriptError::InvalidBendText(_))));
        for style in 0..=7 {
            assert_eq!(Bend::try_from(style).unwrap().style() as i64, style);
        }
    }

    #[test]
    fn test_layer_rejects_string_in_json() {
        let err = serde_json::from_str::<Layer>("\"x\"");
        assert!(err.is_err());
        let err = serde_json::from_str::<Bend>("9").unwrap_err();
        assert!(err.to_string().contains("bend"));
    }

    #[test]
    fn test_r_theta_appends_polar_offset() {
        let mut s = signal();
        s.add(1.0, 2.0);
        s.r_theta(4.0, FRAC_PI_3).unwrap();
        let last = s.last().unwrap();
        assert!((last.x - (1.0 + 4.0 * FRAC_PI_3.cos())).abs() < 1e-12);
        assert!((last.y - (2.0 + 4.0 * FRAC_PI_3.sin())).abs() < 1e-12);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_r_theta_on_empty_signal_fails() {
        let mut s = signal();
        assert!(matches!(
            s.r_theta(1.0, 0.0),
            Err(ScriptError::EmptySignal(SignalId(7)))
        ));
        assert!(s.is_empty());
    }

    #[test]
    fn test_draw_wire_count() {
        let mut s = signal();
        assert_eq!(wire_lines(&s.draw()), 0);
        s.add(0.0, 0.0);
        assert_eq!(wire_lines(&s.draw()), 0);
        for n in 1..5 {
            s.add(n as f64, 0.0);
            assert_eq!(wire_lines(&s.draw()), n);
        }
    }

    #[test]
    fn test_draw_syntax() {
        let mut s = signal();
        s.add(0.0, 0.0).add(1.5, 0.0).add(1.5, -2.0);
        assert_eq!(
            s.draw(),
            "LAYER 1\n\
             SET WIRE_BEND 2;\n\
             WIRE 'RTE7' (0 0) 0.25mm (1.5 0)\n\
             WIRE 'RTE7' (1.5 0) 0.25mm (1.5 -2)\n"
        );
        assert!((s.length() - 3.5).abs() < 1e-12);
    }
}
