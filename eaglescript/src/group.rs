//! Bundled signals
//!
//! A `SignalGroup` borrows several signals that run parallel to each other
//! and moves their ends together: extending them side by side
//! (`grouped_r_theta`) or turning the whole bundle onto a new heading
//! (`elbow`).
//!
//! Members are assumed to be parallel and ordered across the bundle. Neither
//! is checked; a bundle that violates this produces wrong geometry rather
//! than an error.

use std::f64::consts::FRAC_PI_2;

use crate::core::ScriptError;
use crate::geometry::{distance_theta, project, Point};
use crate::signal::{Signal, SignalId};

/// Below this, `sin(theta_f - theta_i)` is treated as zero and the corner
/// offsets have no unique solution.
const SINGULAR_SIN: f64 = 1e-9;

/// Spacing mismatch tolerated when a singular bend is still consistent.
const SPACING_TOLERANCE: f64 = 1e-9;

/// Mutable view over signals that are routed as a bundle.
#[derive(Debug)]
pub struct SignalGroup<'a> {
    members: Vec<&'a mut Signal>,
}

impl<'a> SignalGroup<'a> {
    pub fn new(members: Vec<&'a mut Signal>) -> Self {
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn ids(&self) -> Vec<SignalId> {
        self.members.iter().map(|s| s.id()).collect()
    }

    pub fn members(&self) -> impl Iterator<Item = &Signal> {
        self.members.iter().map(|s| &**s)
    }

    fn last_points(&self) -> Result<Vec<Point>, ScriptError> {
        self.members
            .iter()
            .map(|s| {
                s.last()
                    .map(|v| v.point())
                    .ok_or(ScriptError::EmptySignal(s.id()))
            })
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<(), ScriptError> {
        if index < self.members.len() {
            Ok(())
        } else {
            Err(ScriptError::PivotOutOfRange {
                index,
                len: self.members.len(),
            })
        }
    }

    /// Lateral offset between each adjacent pair of last vertices, measured
    /// to the left of `heading` (along `heading + pi/2`).
    pub fn spacing(&self, heading: f64) -> Result<Vec<f64>, ScriptError> {
        let lasts = self.last_points()?;
        Ok(lasts
            .windows(2)
            .map(|pair| distance_theta(pair[0], pair[1], heading + FRAC_PI_2))
            .collect())
    }

    /// Extend every member by `r` along `theta`, so the new ends all line up
    /// with the end of member `center` on a line perpendicular to `theta`.
    ///
    /// Members that trail or lead the centre are lengthened or shortened
    /// accordingly.
    pub fn grouped_r_theta(&mut self, r: f64, theta: f64, center: usize) -> Result<(), ScriptError> {
        self.check_index(center)?;
        let lasts = self.last_points()?;
        let anchor = lasts[center];

        for (member, last) in self.members.iter_mut().zip(lasts) {
            let step = r + distance_theta(last, anchor, theta);
            member.r_theta(step, theta)?;
        }
        Ok(())
    }

    /// Turn the bundle from heading `theta_i` onto heading `theta_f`.
    ///
    /// Each member's last vertex is slid along its own pre-bend line to
    /// become its corner, placed so that after the turn adjacent members sit
    /// `final_spacing` apart (signed, measured to the left of `theta_f`).
    /// Without `final_spacing` the current spacing is kept. Member `fixed`
    /// keeps its corner where its last vertex is; the others are chained off
    /// it. The bundle is then extended by `distance` along `theta_f`.
    ///
    /// Nothing is modified when an error is returned.
    pub fn elbow(
        &mut self,
        theta_i: f64,
        theta_f: f64,
        distance: f64,
        final_spacing: Option<&[f64]>,
        fixed: usize,
    ) -> Result<(), ScriptError> {
        self.check_index(fixed)?;
        let lasts = self.last_points()?;
        let initial = self.spacing(theta_i)?;

        let target = match final_spacing {
            Some(spacing) if spacing.len() != initial.len() => {
                return Err(ScriptError::SpacingMismatch {
                    expected: initial.len(),
                    found: spacing.len(),
                });
            }
            Some(spacing) => spacing.to_vec(),
            None => initial.clone(),
        };

        let (sin, cos) = (theta_f - theta_i).sin_cos();
        let mut offsets = Vec::with_capacity(initial.len());
        for (&lateral, &wanted) in initial.iter().zip(&target) {
            let longitudinal = corner_offset(lateral, wanted, sin, cos).ok_or(
                ScriptError::DegenerateBend {
                    theta_i,
                    theta_f,
                },
            )?;
            let (dx, dy) = project(longitudinal, lateral, 0.0, theta_i);
            offsets.push(Point::new(dx, dy));
        }

        let mut base = offsets[..fixed]
            .iter()
            .fold(lasts[fixed], |p, offset| p - *offset);

        tracing::debug!(
            "Elbow of {} signals from {:.4} to {:.4} rad around member {}",
            self.members.len(),
            theta_i,
            theta_f,
            fixed
        );

        for (index, member) in self.members.iter_mut().enumerate() {
            if let Some(vertex) = member.last_mut() {
                vertex.set(base);
            }
            if let Some(offset) = offsets.get(index) {
                base += *offset;
            }
        }

        self.grouped_r_theta(distance, theta_f, fixed)
    }
}

/// Distance along the pre-bend heading from one member's corner to the next
/// member's corner.
///
/// Corners at `a` and `b` on lines `lateral` apart give a post-bend spacing
/// of `lateral cos(d) - (b - a) sin(d)`, so `b - a` follows directly unless
/// `sin(d)` vanishes. In that case the only consistent request is one the
/// bend already satisfies, and the offset is zero.
fn corner_offset(lateral: f64, wanted: f64, sin: f64, cos: f64) -> Option<f64> {
    let excess = lateral * cos - wanted;
    if sin.abs() < SINGULAR_SIN {
        (excess.abs() < SPACING_TOLERANCE).then_some(0.0)
    } else {
        Some(excess / sin)
    }
}
