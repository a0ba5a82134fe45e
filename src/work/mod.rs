//! Lijnintegralen `W = ∫ F(r(t)) · r'(t) dt` met de trapeziumregel.

pub mod sweep;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{Point2, linspace};
use crate::path::Path2;

pub use sweep::{SweepPoint, find_minimum, sweep_family};

pub const DEFAULT_SAMPLES: usize = 2000;

/// Alles wat een punt op een vector afbeeldt.
pub trait VectorField {
    fn evaluate(&self, point: Point2) -> Point2;

    #[must_use]
    fn evaluate_points(&self, points: &[Point2]) -> Vec<Point2> {
        points.iter().map(|&point| self.evaluate(point)).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorkError {
    #[error("de trapeziumregel heeft minstens 2 monsters nodig, kreeg er {0}")]
    InvalidSampleCount(usize),
}

/// Parameterinterval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub const UNIT: Self = Self::new(0.0, 1.0);

    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Arbeid van `field` langs `path` over `interval` met `samples` monsters.
/// NaN of oneindige veldwaarden planten zich voort in het resultaat.
pub fn line_integral<F, P>(
    field: &F,
    path: &P,
    interval: Interval,
    samples: usize,
) -> Result<f64, WorkError>
where
    F: VectorField + ?Sized,
    P: Path2 + ?Sized,
{
    if samples < 2 {
        return Err(WorkError::InvalidSampleCount(samples));
    }
    let t = linspace(interval.start, interval.end, samples);
    let positions = path.positions(&t);
    let tangents = path.velocities(&t);
    let values = field.evaluate_points(&positions);
    let integrand: Vec<f64> = values
        .iter()
        .zip(&tangents)
        .map(|(value, tangent)| value[0] * tangent[0] + value[1] * tangent[1])
        .collect();
    Ok(trapezoid(&integrand, &t))
}

/// `Σ (t[i+1] - t[i]) (y[i+1] + y[i]) / 2`, in vaste volgorde.
#[must_use]
pub fn trapezoid(values: &[f64], samples: &[f64]) -> f64 {
    values
        .windows(2)
        .zip(samples.windows(2))
        .map(|(y, t)| (t[1] - t[0]) * (y[1] + y[0]) / 2.0)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{CanonicalParabola, StraightLine};

    struct Radial;

    impl VectorField for Radial {
        fn evaluate(&self, point: Point2) -> Point2 {
            [2.0 * point[0], 2.0 * point[1]]
        }
    }

    struct Rotation;

    impl VectorField for Rotation {
        fn evaluate(&self, point: Point2) -> Point2 {
            [-point[1], point[0]]
        }
    }

    #[test]
    fn trapezoid_is_exact_for_linear_integrands() {
        let t = linspace(0.0, 2.0, 5);
        let values: Vec<f64> = t.iter().map(|t| 3.0 * t + 1.0).collect();
        assert!((trapezoid(&values, &t) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn gradient_work_depends_only_on_endpoints() {
        let line = StraightLine::new([0.0, 0.0], [1.0, 1.0]);
        let work_line = line_integral(&Radial, &line, Interval::UNIT, 500).expect("samples");
        let work_curve =
            line_integral(&Radial, &CanonicalParabola, Interval::UNIT, 2000).expect("samples");
        assert!((work_line - 2.0).abs() < 1e-6);
        assert!((work_curve - 2.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_work_depends_on_the_path() {
        let line = StraightLine::new([0.0, 0.0], [1.0, 1.0]);
        let work_line = line_integral(&Rotation, &line, Interval::UNIT, 2000).expect("samples");
        let work_curve =
            line_integral(&Rotation, &CanonicalParabola, Interval::UNIT, 2000).expect("samples");
        assert!(work_line.abs() < 1e-12);
        assert!((work_curve - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn too_few_samples_is_an_error() {
        let line = StraightLine::new([0.0, 0.0], [1.0, 1.0]);
        assert_eq!(
            line_integral(&Radial, &line, Interval::UNIT, 1),
            Err(WorkError::InvalidSampleCount(1))
        );
        assert!(line_integral(&Radial, &line, Interval::UNIT, 2).is_ok());
    }

    #[test]
    fn non_finite_values_propagate() {
        struct Broken;
        impl VectorField for Broken {
            fn evaluate(&self, _point: Point2) -> Point2 {
                [f64::NAN, 0.0]
            }
        }
        let line = StraightLine::new([0.0, 0.0], [1.0, 1.0]);
        let work = line_integral(&Broken, &line, Interval::UNIT, 10).expect("samples");
        assert!(work.is_nan());
    }
}
