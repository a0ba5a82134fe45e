//! Bemonsteringsroosters en platte puntarrays met een vorm.
//!
//! De arrays volgen de conventies van numpy: `linspace` bevat beide
//! eindpunten en `meshgrid` levert vormen `[ny, nx]` op.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Point2 = [f64; 2];

/// Relatieve marge rond de paden bij [`PlotWindow::around`].
const WINDOW_PADDING: f64 = 0.2;
/// Vaste marge als alle punten op één coördinaat liggen.
const FLAT_PADDING: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("vorm {shape:?} verwacht {expected} elementen, kreeg er {actual}")]
    Length {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },
    #[error("vormen komen niet overeen: {left:?} tegenover {right:?}")]
    ShapeMismatch { left: Vec<usize>, right: Vec<usize> },
}

fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

fn check_length(shape: &[usize], actual: usize) -> Result<(), GridError> {
    let expected = element_count(shape);
    if expected == actual {
        Ok(())
    } else {
        Err(GridError::Length {
            shape: shape.to_vec(),
            expected,
            actual,
        })
    }
}

/// Punten `[x, y]` in rij-volgorde met een willekeurige vorm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointArray {
    shape: Vec<usize>,
    points: Vec<Point2>,
}

impl PointArray {
    pub fn new(shape: Vec<usize>, points: Vec<Point2>) -> Result<Self, GridError> {
        check_length(&shape, points.len())?;
        Ok(Self { shape, points })
    }

    /// Eendimensionale array `[n]`.
    #[must_use]
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self {
            shape: vec![points.len()],
            points,
        }
    }

    /// Leest een platte reeks `x0, y0, x1, y1, ...`.
    pub fn from_flat(shape: Vec<usize>, coordinates: &[f64]) -> Result<Self, GridError> {
        if coordinates.len() % 2 != 0 {
            return Err(GridError::Length {
                shape,
                expected: coordinates.len() / 2 + 1,
                actual: coordinates.len() / 2,
            });
        }
        let points = coordinates
            .chunks_exact(2)
            .map(|pair| [pair[0], pair[1]])
            .collect();
        Self::new(shape, points)
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn to_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|point| point.iter().copied()).collect()
    }

    /// Past `f` toe op elk punt; de vorm blijft behouden.
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Point2) -> Point2,
    {
        Self {
            shape: self.shape.clone(),
            points: self.points.iter().map(f).collect(),
        }
    }
}

/// Scalaire waarden in rij-volgorde met een willekeurige vorm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarArray {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl ScalarArray {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Result<Self, GridError> {
        check_length(&shape, values.len())?;
        Ok(Self { shape, values })
    }

    #[must_use]
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `n` gelijk verdeelde waarden van `start` tot en met `end`.
#[must_use]
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// Coördinaatmatrices van vorm `[ys.len(), xs.len()]`.
#[must_use]
pub fn meshgrid(xs: &[f64], ys: &[f64]) -> (ScalarArray, ScalarArray) {
    let shape = vec![ys.len(), xs.len()];
    let mut grid_x = Vec::with_capacity(xs.len() * ys.len());
    let mut grid_y = Vec::with_capacity(xs.len() * ys.len());
    for &y in ys {
        for &x in xs {
            grid_x.push(x);
            grid_y.push(y);
        }
    }
    (
        ScalarArray {
            shape: shape.clone(),
            values: grid_x,
        },
        ScalarArray {
            shape,
            values: grid_y,
        },
    )
}

/// Voegt twee coördinaatarrays samen tot punten; de vormen moeten gelijk zijn.
pub fn stack_points(xs: &ScalarArray, ys: &ScalarArray) -> Result<PointArray, GridError> {
    if xs.shape != ys.shape {
        return Err(GridError::ShapeMismatch {
            left: xs.shape.clone(),
            right: ys.shape.clone(),
        });
    }
    let points = xs
        .values
        .iter()
        .zip(&ys.values)
        .map(|(&x, &y)| [x, y])
        .collect();
    Ok(PointArray {
        shape: xs.shape.clone(),
        points,
    })
}

/// Rechthoekig gebied in het vlak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotWindow {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl PlotWindow {
    #[must_use]
    pub const fn new(x: [f64; 2], y: [f64; 2]) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn square(min: f64, max: f64) -> Self {
        Self::new([min, max], [min, max])
    }

    /// Omhullende van alle punten met 20% marge aan elke kant. `None` als er
    /// geen eindige punten zijn.
    #[must_use]
    pub fn around<'a, I>(paths: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [Point2]>,
    {
        let mut bounds: Option<([f64; 2], [f64; 2])> = None;
        for point in paths.into_iter().flatten() {
            if !point[0].is_finite() || !point[1].is_finite() {
                continue;
            }
            let (x, y) = bounds.get_or_insert(([point[0]; 2], [point[1]; 2]));
            x[0] = x[0].min(point[0]);
            x[1] = x[1].max(point[0]);
            y[0] = y[0].min(point[1]);
            y[1] = y[1].max(point[1]);
        }
        let (x, y) = bounds?;
        Some(Self::new(padded(x), padded(y)))
    }

    /// Regelmatig rooster met `density` punten per as.
    #[must_use]
    pub fn sample(&self, density: usize) -> (ScalarArray, ScalarArray) {
        let xs = linspace(self.x[0], self.x[1], density);
        let ys = linspace(self.y[0], self.y[1], density);
        meshgrid(&xs, &ys)
    }
}

fn padded(range: [f64; 2]) -> [f64; 2] {
    let span = range[1] - range[0];
    let pad = if span > 0.0 {
        span * WINDOW_PADDING
    } else {
        FLAT_PADDING
    };
    [range[0] - pad, range[1] + pad]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_both_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(-2.0, 2.0, 81).last(), Some(&2.0));
    }

    #[test]
    fn meshgrid_uses_row_major_layout() {
        let (gx, gy) = meshgrid(&[0.0, 1.0, 2.0], &[10.0, 20.0]);
        assert_eq!(gx.shape(), &[2, 3]);
        assert_eq!(gx.values(), &[0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
        assert_eq!(gy.values(), &[10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);
    }

    #[test]
    fn stack_points_requires_matching_shapes() {
        let (gx, gy) = meshgrid(&[0.0, 1.0], &[5.0]);
        let stacked = stack_points(&gx, &gy).expect("same shape");
        assert_eq!(stacked.points(), &[[0.0, 5.0], [1.0, 5.0]]);

        let other = ScalarArray::from_values(vec![1.0, 2.0]);
        assert!(matches!(
            stack_points(&gx, &other),
            Err(GridError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn arrays_validate_their_length() {
        assert!(PointArray::new(vec![2, 2], vec![[0.0, 0.0]; 3]).is_err());
        let array = PointArray::from_flat(vec![2], &[1.0, 2.0, 3.0, 4.0]).expect("valid");
        assert_eq!(array.points(), &[[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(array.to_flat(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn window_pads_the_bounding_box() {
        let line: Vec<Point2> = vec![[0.0, 0.0], [1.0, 1.0]];
        let window = PlotWindow::around([line.as_slice()]).expect("points");
        assert!((window.x[0] + 0.2).abs() < 1e-12);
        assert!((window.x[1] - 1.2).abs() < 1e-12);
        assert!(PlotWindow::around(std::iter::empty::<&[Point2]>()).is_none());
    }

    #[test]
    fn flat_extent_gets_a_fixed_margin() {
        let horizontal: Vec<Point2> = vec![[0.0, 0.5], [2.0, 0.5]];
        let window = PlotWindow::around([horizontal.as_slice()]).expect("points");
        assert_eq!(window.y, [-0.5, 1.5]);
        assert!((window.x[1] - 2.4).abs() < 1e-12);
    }
}
