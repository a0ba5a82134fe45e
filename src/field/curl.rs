//! Scalaire curl `∂Q/∂x - ∂P/∂y` en de classificatie conservatief/niet.

use super::SymbolicField;
use crate::symbolic::simplify::add;
use crate::symbolic::{Expr, Var, derivative};

#[derive(Debug, Clone, PartialEq)]
pub struct CurlAnalysis {
    pub curl: Expr,
    /// Waar als de vereenvoudigde curl structureel nul is.
    pub conservative: bool,
}

#[must_use]
pub fn classify(field: &SymbolicField) -> CurlAnalysis {
    let dq_dx = derivative(field.q(), Var::X);
    let dp_dy = derivative(field.p(), Var::Y);
    let curl = add(vec![dq_dx, -dp_dy]);
    let conservative = curl.is_zero();
    CurlAnalysis { curl, conservative }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curl_of(p: &str, q: &str) -> CurlAnalysis {
        classify(&SymbolicField::parse(p, q).expect("valid field"))
    }

    #[test]
    fn gradient_fields_are_conservative() {
        assert!(curl_of("2*x", "2*y").conservative);
        assert!(curl_of("y*cos(x*y)", "x*cos(x*y)").conservative);
        assert!(curl_of("3*x^2*y + 2*y^2", "x^3 + 4*x*y + 5").conservative);
    }

    #[test]
    fn rotation_has_constant_curl() {
        let analysis = curl_of("-y", "x");
        assert!(!analysis.conservative);
        assert_eq!(analysis.curl, Expr::Num(2.0));
    }

    #[test]
    fn curl_is_kept_symbolic() {
        let analysis = curl_of("x*y", "0");
        assert!(!analysis.conservative);
        assert_eq!(analysis.curl, -Expr::x());
    }
}
