//! Compileert symbolische expressies naar numerieke functies van `(x, y)`.

use std::fmt;
use std::rc::Rc;

use meval::Context;

use super::{FieldError, SymbolicField};
use crate::grid::{GridError, Point2, PointArray, ScalarArray};
use crate::symbolic::Expr;
use crate::work::VectorField;

type ScalarFn = Rc<dyn Fn(f64, f64) -> f64>;

/// Een expressie die via `meval` aan de variabelen `x` en `y` gebonden is.
#[derive(Clone)]
pub struct CompiledExpr {
    source: String,
    function: ScalarFn,
}

impl CompiledExpr {
    pub fn compile(expr: &Expr) -> Result<Self, FieldError> {
        let source = expr.to_meval_source();
        let parsed: meval::Expr = source
            .parse()
            .map_err(|error: meval::Error| FieldError::Evaluation(error.to_string()))?;
        let function = parsed
            .bind2_with_context(Context::new(), "x", "y")
            .map_err(|error| FieldError::Evaluation(error.to_string()))?;
        Ok(Self {
            source,
            function: Rc::new(function),
        })
    }

    #[must_use]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        (self.function)(x, y)
    }
}

impl fmt::Debug for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpr")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Numerieke evaluator van een veld `(P, Q)`.
#[derive(Debug, Clone)]
pub struct FieldEvaluator {
    p: CompiledExpr,
    q: CompiledExpr,
}

impl FieldEvaluator {
    pub fn compile(field: &SymbolicField) -> Result<Self, FieldError> {
        Ok(Self {
            p: CompiledExpr::compile(field.p())?,
            q: CompiledExpr::compile(field.q())?,
        })
    }

    /// Evalueert het veld eenmaal in de oorsprong; een niet-eindige waarde
    /// betekent dat het veld niet bruikbaar is.
    pub fn validate_at_origin(&self) -> Result<(), FieldError> {
        let [p, q] = self.evaluate([0.0, 0.0]);
        if p.is_finite() && q.is_finite() {
            Ok(())
        } else {
            Err(FieldError::Evaluation(format!(
                "veld is niet eindig in de oorsprong: ({p}, {q})"
            )))
        }
    }

    #[must_use]
    pub fn evaluate_array(&self, points: &PointArray) -> PointArray {
        points.map(|point| self.evaluate(*point))
    }
}

impl VectorField for FieldEvaluator {
    fn evaluate(&self, point: Point2) -> Point2 {
        let [x, y] = point;
        [self.p.eval(x, y), self.q.eval(x, y)]
    }
}

/// Een herwonnen potentiaal `f` met `∇f = F`.
#[derive(Debug, Clone)]
pub struct Potential {
    expr: Expr,
    compiled: CompiledExpr,
}

impl Potential {
    pub fn compile(expr: Expr) -> Result<Self, FieldError> {
        let compiled = CompiledExpr::compile(&expr)?;
        Ok(Self { expr, compiled })
    }

    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    #[must_use]
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        self.compiled.eval(x, y)
    }

    /// Evalueert elementgewijs over twee coördinaatarrays van dezelfde vorm.
    pub fn evaluate_grid(&self, xs: &ScalarArray, ys: &ScalarArray) -> Result<ScalarArray, GridError> {
        if xs.shape() != ys.shape() {
            return Err(GridError::ShapeMismatch {
                left: xs.shape().to_vec(),
                right: ys.shape().to_vec(),
            });
        }
        let values = xs
            .values()
            .iter()
            .zip(ys.values())
            .map(|(&x, &y)| self.eval(x, y))
            .collect();
        ScalarArray::new(xs.shape().to_vec(), values)
    }
}
