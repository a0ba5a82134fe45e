//! Symbolische primitieven naar één variabele.
//!
//! De integrator kent alleen lineariteit, constante factoren,
//! substitutie `∫ f(u(v)) u'(v) dv` voor elementaire `f`, partiële integratie
//! voor `v^n * g(av + b)` en `1/(A v^2 + C)`. Alles daarbuiten levert
//! [`IntegrationError::NoClosedForm`] op.

use thiserror::Error;

use super::diff::differentiate;
use super::simplify::{add, apply, factors_of, is_integer, mul, pow, simplify, terms_of};
use super::{Expr, Func, Var};

/// Hoogste macht `v^n` waarvoor partiële integratie herhaald wordt.
const MAX_PARTS_DEGREE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrationError {
    #[error("geen gesloten primitieve gevonden voor `{expr}` naar {var}")]
    NoClosedForm { expr: String, var: Var },
}

/// Een primitieve van `expr` naar `var`, zonder integratieconstante.
pub fn antiderivative(expr: &Expr, var: Var) -> Result<Expr, IntegrationError> {
    integrate(&simplify(expr), var)
}

fn integrate(expr: &Expr, var: Var) -> Result<Expr, IntegrationError> {
    if !expr.depends_on(var) {
        return Ok(mul(vec![expr.clone(), Expr::Var(var)]));
    }
    match expr {
        Expr::Add(terms) => terms
            .iter()
            .map(|term| integrate(term, var))
            .collect::<Result<Vec<_>, _>>()
            .map(add),
        Expr::Mul(factors) => {
            let (mut constants, dependent): (Vec<Expr>, Vec<Expr>) =
                factors.iter().cloned().partition(|factor| !factor.depends_on(var));
            let integral =
                integrate_product(&dependent, var).ok_or_else(|| no_closed_form(expr, var))?;
            constants.push(integral);
            Ok(mul(constants))
        }
        other => integrate_product(std::slice::from_ref(other), var)
            .ok_or_else(|| no_closed_form(expr, var)),
    }
}

fn no_closed_form(expr: &Expr, var: Var) -> IntegrationError {
    IntegrationError::NoClosedForm {
        expr: expr.to_string(),
        var,
    }
}

/// Primitieve van een product van factoren die allemaal van `var` afhangen.
fn integrate_product(factors: &[Expr], var: Var) -> Option<Expr> {
    if let Some(result) = by_substitution(factors, var) {
        return Some(result);
    }
    if let [single] = factors {
        if let Some(result) = reciprocal_quadratic(single, var) {
            return Some(result);
        }
    }
    by_parts(factors, var)
}

/// Zoekt een factor `f(u)` waarvoor de overige factoren gelijk zijn aan
/// `c * u'` met `c` onafhankelijk van `var`.
fn by_substitution(factors: &[Expr], var: Var) -> Option<Expr> {
    for (index, candidate) in factors.iter().enumerate() {
        let Some((inner, outer)) = outer_antiderivative(candidate, var) else {
            continue;
        };
        let inner_derivative = differentiate(&inner, var);
        if inner_derivative.is_zero() {
            continue;
        }
        let mut rest: Vec<Expr> = factors
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .map(|(_, factor)| factor.clone())
            .collect();
        rest.push(pow(inner_derivative, Expr::Num(-1.0)));
        let ratio = mul(rest);
        if ratio.depends_on(var) {
            continue;
        }
        return Some(mul(vec![ratio, outer]));
    }
    None
}

/// Splitst een factor in `(u, F(u))` met `F` een primitieve van de buitenste functie.
fn outer_antiderivative(factor: &Expr, var: Var) -> Option<(Expr, Expr)> {
    match factor {
        Expr::Var(v) if *v == var => Some((
            factor.clone(),
            mul(vec![Expr::Num(0.5), pow(factor.clone(), Expr::Num(2.0))]),
        )),
        Expr::Pow(base, exponent) if !exponent.depends_on(var) => {
            let n = exponent.as_num()?;
            let base = (**base).clone();
            if n == -1.0 {
                Some((base.clone(), apply(Func::Ln, base)))
            } else {
                let raised = pow(base.clone(), Expr::Num(n + 1.0));
                Some((base, mul(vec![Expr::Num(1.0 / (n + 1.0)), raised])))
            }
        }
        Expr::Pow(base, exponent) if !base.depends_on(var) => {
            let u = (**exponent).clone();
            let scale = pow(apply(Func::Ln, (**base).clone()), Expr::Num(-1.0));
            Some((u, mul(vec![factor.clone(), scale])))
        }
        Expr::Func(func, arg) => {
            let u = (**arg).clone();
            let primitive = elementary_primitive(*func, &u);
            Some((u, primitive))
        }
        _ => None,
    }
}

/// `∫ f(u) du` voor elke toegestane elementaire functie.
fn elementary_primitive(func: Func, u: &Expr) -> Expr {
    let u = u.clone();
    let square = || pow(u.clone(), Expr::Num(2.0));
    let one_minus_square = || add(vec![Expr::Num(1.0), mul(vec![Expr::Num(-1.0), square()])]);
    match func {
        Func::Sin => mul(vec![Expr::Num(-1.0), apply(Func::Cos, u.clone())]),
        Func::Cos => apply(Func::Sin, u.clone()),
        Func::Tan => mul(vec![
            Expr::Num(-1.0),
            apply(Func::Ln, apply(Func::Cos, u.clone())),
        ]),
        Func::Sinh => apply(Func::Cosh, u.clone()),
        Func::Cosh => apply(Func::Sinh, u.clone()),
        Func::Tanh => apply(Func::Ln, apply(Func::Cosh, u.clone())),
        Func::Exp => apply(Func::Exp, u.clone()),
        Func::Ln => add(vec![
            mul(vec![u.clone(), apply(Func::Ln, u.clone())]),
            mul(vec![Expr::Num(-1.0), u.clone()]),
        ]),
        Func::Atan => add(vec![
            mul(vec![u.clone(), apply(Func::Atan, u.clone())]),
            mul(vec![
                Expr::Num(-0.5),
                apply(Func::Ln, add(vec![Expr::Num(1.0), square()])),
            ]),
        ]),
        Func::Asin => add(vec![
            mul(vec![u.clone(), apply(Func::Asin, u.clone())]),
            pow(one_minus_square(), Expr::Num(0.5)),
        ]),
        Func::Acos => add(vec![
            mul(vec![u.clone(), apply(Func::Acos, u.clone())]),
            mul(vec![Expr::Num(-1.0), pow(one_minus_square(), Expr::Num(0.5))]),
        ]),
        Func::Abs => mul(vec![Expr::Num(0.5), u.clone(), apply(Func::Abs, u.clone())]),
    }
}

/// `∫ 1/(A v^2 + C) dv = atan(v sqrt(A/C)) / sqrt(A C)` voor `A C > 0`.
/// Een symbolische `A` of `C` moet daarvoor een exact kwadraat zijn.
fn reciprocal_quadratic(factor: &Expr, var: Var) -> Option<Expr> {
    let Expr::Pow(base, exponent) = factor else {
        return None;
    };
    if exponent.as_num() != Some(-1.0) {
        return None;
    }
    let coefficients = polynomial_coefficients(base, var)?;
    let [c, b, a] = coefficients.as_slice() else {
        return None;
    };
    if !b.is_zero() || c.is_zero() {
        return None;
    }
    if let (Some(a), Some(c)) = (a.as_num(), c.as_num()) {
        if a * c <= 0.0 {
            return None;
        }
    }
    let root_a = square_root(a);
    let root_c = square_root(c);
    let scale = pow(mul(vec![root_a.clone(), root_c.clone()]), Expr::Num(-1.0));
    let argument = mul(vec![Expr::Var(var), root_a, pow(root_c, Expr::Num(-1.0))]);
    Some(mul(vec![scale, apply(Func::Atan, argument)]))
}

/// `sqrt(expr)`, zonder wortel als `expr` een exact kwadraat is (`y^2` wordt `y`).
/// Het teken van de wortel maakt voor `atan(v w) / w` niet uit.
fn square_root(expr: &Expr) -> Expr {
    exact_square_root(expr).unwrap_or_else(|| pow(expr.clone(), Expr::Num(0.5)))
}

fn exact_square_root(expr: &Expr) -> Option<Expr> {
    match expr {
        Expr::Num(value) if *value >= 0.0 => Some(Expr::Num(value.sqrt())),
        Expr::Pow(base, exponent) => {
            let half = exponent.as_num()? / 2.0;
            is_integer(half).then(|| pow((**base).clone(), Expr::Num(half)))
        }
        Expr::Mul(factors) => factors
            .iter()
            .map(exact_square_root)
            .collect::<Option<Vec<_>>>()
            .map(mul),
        _ => None,
    }
}

/// Coëfficiënten (laagste graad eerst) als `expr` een veelterm in `var` is.
fn polynomial_coefficients(expr: &Expr, var: Var) -> Option<Vec<Expr>> {
    let mut by_degree: Vec<Vec<Expr>> = Vec::new();
    for term in terms_of(expr) {
        let mut degree = 0usize;
        let mut coefficient = Vec::new();
        for factor in factors_of(term) {
            match monomial_degree(factor, var) {
                Some(d) => degree += d,
                None if factor.depends_on(var) => return None,
                None => coefficient.push(factor.clone()),
            }
        }
        if by_degree.len() <= degree {
            by_degree.resize(degree + 1, Vec::new());
        }
        by_degree[degree].push(mul(coefficient));
    }
    Some(by_degree.into_iter().map(add).collect())
}

/// Graad van `v` of `v^n` met `n` een positief geheel getal.
fn monomial_degree(factor: &Expr, var: Var) -> Option<usize> {
    match factor {
        Expr::Var(v) if *v == var => Some(1),
        Expr::Pow(base, exponent) if **base == Expr::Var(var) => {
            let n = exponent.as_num()?;
            (is_integer(n) && n > 0.0 && n <= MAX_PARTS_DEGREE).then_some(n as usize)
        }
        _ => None,
    }
}

/// `∫ v^n g(u) dv = v^n G - n ∫ v^(n-1) G dv` met `u` lineair in `v`.
fn by_parts(factors: &[Expr], var: Var) -> Option<Expr> {
    let [first, second] = factors else {
        return None;
    };
    for (power, other) in [(first, second), (second, first)] {
        let Some(degree) = monomial_degree(power, var) else {
            continue;
        };
        let Expr::Func(func, arg) = other else {
            continue;
        };
        if !matches!(func, Func::Exp | Func::Sin | Func::Cos | Func::Sinh | Func::Cosh) {
            continue;
        }
        let slope = differentiate(arg, var);
        if slope.is_zero() || slope.depends_on(var) {
            continue;
        }
        let primitive = mul(vec![
            pow(slope, Expr::Num(-1.0)),
            elementary_primitive(*func, arg),
        ]);
        let n = degree as f64;
        let reduced = mul(vec![
            Expr::Num(n),
            pow(Expr::Var(var), Expr::Num(n - 1.0)),
            primitive.clone(),
        ]);
        let remainder = integrate(&reduced, var).ok()?;
        return Some(add(vec![
            mul(vec![pow(Expr::Var(var), Expr::Num(n)), primitive]),
            mul(vec![Expr::Num(-1.0), remainder]),
        ]));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{derivative, parse_expression};

    fn integral(source: &str, var: Var) -> Result<Expr, IntegrationError> {
        antiderivative(&parse_expression(source).expect("parse"), var)
    }

    fn canonical(source: &str) -> Expr {
        simplify(&parse_expression(source).expect("parse"))
    }

    /// Controleert de primitieve door terug te differentiëren.
    fn assert_inverts(source: &str, var: Var) {
        let primitive = integral(source, var).expect("integrable");
        let back = derivative(&primitive, var);
        assert_eq!(back, canonical(source), "primitive {primitive} of {source}");
    }

    #[test]
    fn integrates_polynomials_termwise() {
        assert_eq!(integral("2*x", Var::X).expect("integrable"), canonical("x^2"));
        assert_eq!(
            integral("3*x^2*y + y", Var::X).expect("integrable"),
            canonical("x^3*y + x*y")
        );
    }

    #[test]
    fn treats_other_variable_as_constant() {
        assert_eq!(integral("2*y", Var::X).expect("integrable"), canonical("2*x*y"));
    }

    #[test]
    fn substitutes_inner_functions() {
        assert_eq!(
            integral("y*cos(x*y)", Var::X).expect("integrable"),
            canonical("sin(x*y)")
        );
        assert_inverts("2*x*exp(x^2)", Var::X);
        assert_inverts("x/(x^2 + 1)", Var::X);
    }

    #[test]
    fn integrates_by_parts() {
        assert_inverts("x*exp(x)", Var::X);
        assert_inverts("x^2*cos(x)", Var::X);
    }

    #[test]
    fn integrates_reciprocal_quadratics() {
        assert_eq!(
            integral("1/(1 + x^2)", Var::X).expect("integrable"),
            canonical("atan(x)")
        );
    }

    #[test]
    fn reciprocal_quadratics_with_square_coefficients_avoid_roots() {
        let primitive = integral("1/(1 + x^2*y^2)", Var::X).expect("integrable");
        assert_eq!(primitive, canonical("atan(x*y)/y"));
        assert_inverts("1/(1 + x^2*y^2)", Var::X);
    }

    #[test]
    fn reports_missing_closed_forms() {
        let error = integral("exp(x^2)", Var::X).expect_err("no elementary primitive");
        assert!(matches!(error, IntegrationError::NoClosedForm { var: Var::X, .. }));
    }
}
