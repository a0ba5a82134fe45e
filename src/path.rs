//! Geparametriseerde paden `r(t)` met exacte snelheid `r'(t)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::Point2;

pub trait Path2 {
    fn position(&self, t: f64) -> Point2;

    fn velocity(&self, t: f64) -> Point2;

    #[must_use]
    fn positions(&self, samples: &[f64]) -> Vec<Point2> {
        samples.iter().map(|&t| self.position(t)).collect()
    }

    #[must_use]
    fn velocities(&self, samples: &[f64]) -> Vec<Point2> {
        samples.iter().map(|&t| self.velocity(t)).collect()
    }
}

/// `r(t) = A + (B - A) t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLine {
    pub start: Point2,
    pub end: Point2,
}

impl StraightLine {
    #[must_use]
    pub const fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }
}

impl Path2 for StraightLine {
    fn position(&self, t: f64) -> Point2 {
        [
            self.start[0] + (self.end[0] - self.start[0]) * t,
            self.start[1] + (self.end[1] - self.start[1]) * t,
        ]
    }

    fn velocity(&self, _t: f64) -> Point2 {
        [self.end[0] - self.start[0], self.end[1] - self.start[1]]
    }
}

/// `r(t) = (t, t^2)`, van (0,0) naar (1,1) op `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanonicalParabola;

impl Path2 for CanonicalParabola {
    fn position(&self, t: f64) -> Point2 {
        [t, t * t]
    }

    fn velocity(&self, t: f64) -> Point2 {
        [1.0, 2.0 * t]
    }
}

/// Parabool van A naar B: `x` lineair, `y` kwadratisch in `t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parabola {
    pub start: Point2,
    pub end: Point2,
}

impl Parabola {
    #[must_use]
    pub const fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }
}

impl Path2 for Parabola {
    fn position(&self, t: f64) -> Point2 {
        [
            self.start[0] + (self.end[0] - self.start[0]) * t,
            self.start[1] + (self.end[1] - self.start[1]) * t * t,
        ]
    }

    fn velocity(&self, t: f64) -> Point2 {
        [
            self.end[0] - self.start[0],
            (self.end[1] - self.start[1]) * 2.0 * t,
        ]
    }
}

/// `y(t) = Ay + (By - Ay) ((1 - a) t + a t^2)`; `a = 0` is de rechte lijn,
/// `a = 1` de parabool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticFamily {
    pub start: Point2,
    pub end: Point2,
    pub shape: f64,
}

impl QuadraticFamily {
    #[must_use]
    pub const fn new(start: Point2, end: Point2, shape: f64) -> Self {
        Self { start, end, shape }
    }
}

impl Path2 for QuadraticFamily {
    fn position(&self, t: f64) -> Point2 {
        let a = self.shape;
        let blend = (1.0 - a) * t + a * t * t;
        [
            self.start[0] + (self.end[0] - self.start[0]) * t,
            self.start[1] + (self.end[1] - self.start[1]) * blend,
        ]
    }

    fn velocity(&self, t: f64) -> Point2 {
        let a = self.shape;
        [
            self.end[0] - self.start[0],
            (self.end[1] - self.start[1]) * ((1.0 - a) + 2.0 * a * t),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("onbekend padtype `{0}` (verwacht: line, parabola, canonical-parabola, family)")]
pub struct UnknownPathKind(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathKind {
    Line,
    Parabola,
    CanonicalParabola,
    Family,
}

impl PathKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Parabola => "parabola",
            Self::CanonicalParabola => "canonical-parabola",
            Self::Family => "family",
        }
    }
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PathKind {
    type Err = UnknownPathKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "line" | "straight" => Ok(Self::Line),
            "parabola" => Ok(Self::Parabola),
            "canonical-parabola" | "canonical" => Ok(Self::CanonicalParabola),
            "family" | "quadratic" => Ok(Self::Family),
            _ => Err(UnknownPathKind(s.to_owned())),
        }
    }
}

/// Een concreet pad van een van de vier soorten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSpec {
    Line(StraightLine),
    CanonicalParabola(CanonicalParabola),
    Parabola(Parabola),
    Family(QuadraticFamily),
}

impl PathSpec {
    /// Bouwt een pad; `shape` wordt alleen door de familie gebruikt.
    #[must_use]
    pub fn build(kind: PathKind, start: Point2, end: Point2, shape: f64) -> Self {
        match kind {
            PathKind::Line => Self::Line(StraightLine::new(start, end)),
            PathKind::CanonicalParabola => Self::CanonicalParabola(CanonicalParabola),
            PathKind::Parabola => Self::Parabola(Parabola::new(start, end)),
            PathKind::Family => Self::Family(QuadraticFamily::new(start, end, shape)),
        }
    }

    fn as_path(&self) -> &dyn Path2 {
        match self {
            Self::Line(path) => path,
            Self::CanonicalParabola(path) => path,
            Self::Parabola(path) => path,
            Self::Family(path) => path,
        }
    }
}

impl Path2 for PathSpec {
    fn position(&self, t: f64) -> Point2 {
        self.as_path().position(t)
    }

    fn velocity(&self, t: f64) -> Point2 {
        self.as_path().velocity(t)
    }
}
