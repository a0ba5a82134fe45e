//! Arbeid als functie van de vormparameter `a` van de kwadratische familie.

use serde::{Deserialize, Serialize};

use super::{Interval, VectorField, WorkError, line_integral};
use crate::grid::Point2;
use crate::path::QuadraticFamily;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub a: f64,
    pub work: f64,
}

/// `W(a)` voor elke waarde in `values`, in dezelfde volgorde.
pub fn sweep_family<F>(
    field: &F,
    start: Point2,
    end: Point2,
    values: &[f64],
    interval: Interval,
    samples: usize,
) -> Result<Vec<SweepPoint>, WorkError>
where
    F: VectorField + ?Sized,
{
    if samples < 2 {
        return Err(WorkError::InvalidSampleCount(samples));
    }
    values
        .iter()
        .map(|&a| {
            let path = QuadraticFamily::new(start, end, a);
            line_integral(field, &path, interval, samples).map(|work| SweepPoint { a, work })
        })
        .collect()
}

/// Eerste punt met de kleinste arbeid; NaN-waarden tellen niet mee.
#[must_use]
pub fn find_minimum(points: &[SweepPoint]) -> Option<SweepPoint> {
    let mut best: Option<SweepPoint> = None;
    for point in points.iter().filter(|point| !point.work.is_nan()) {
        match best {
            Some(current) if point.work >= current.work => {}
            _ => best = Some(*point),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::linspace;

    struct Rotation;

    impl VectorField for Rotation {
        fn evaluate(&self, point: Point2) -> Point2 {
            [-point[1], point[0]]
        }
    }

    fn point(a: f64, work: f64) -> SweepPoint {
        SweepPoint { a, work }
    }

    #[test]
    fn minimum_prefers_first_occurrence() {
        let points = [point(-1.0, 3.0), point(0.0, 1.0), point(1.0, 1.0), point(2.0, 4.0)];
        assert_eq!(find_minimum(&points), Some(point(0.0, 1.0)));
    }

    #[test]
    fn minimum_skips_nan() {
        let points = [point(0.0, f64::NAN), point(1.0, 5.0), point(2.0, f64::NAN)];
        assert_eq!(find_minimum(&points), Some(point(1.0, 5.0)));
        assert_eq!(find_minimum(&[point(0.0, f64::NAN)]), None);
        assert_eq!(find_minimum(&[]), None);
    }

    #[test]
    fn sweep_keeps_input_order() {
        let values = linspace(-2.0, 2.0, 9);
        let points = sweep_family(&Rotation, [0.0, 0.0], [1.0, 1.0], &values, Interval::UNIT, 400)
            .expect("samples");
        let order: Vec<f64> = points.iter().map(|point| point.a).collect();
        assert_eq!(order, values);
    }

    #[test]
    fn rotation_work_is_linear_in_shape() {
        // W(a) = a / 3 for (-y, x) from (0,0) to (1,1).
        let values = [-2.0, 0.0, 1.0];
        let points = sweep_family(&Rotation, [0.0, 0.0], [1.0, 1.0], &values, Interval::UNIT, 2000)
            .expect("samples");
        for point in points {
            assert!((point.work - point.a / 3.0).abs() < 1e-6, "{point:?}");
        }
    }

    #[test]
    fn sweep_rejects_too_few_samples() {
        let result = sweep_family(&Rotation, [0.0, 0.0], [1.0, 1.0], &[0.0], Interval::UNIT, 0);
        assert_eq!(result, Err(WorkError::InvalidSampleCount(0)));
    }
}
