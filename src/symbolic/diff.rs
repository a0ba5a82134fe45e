//! Partiële afgeleiden.

use super::simplify::{add, apply, mul, pow, simplify};
use super::{Expr, Func, Var};

/// Partiële afgeleide van `expr` naar `var`, in canonieke vorm.
#[must_use]
pub fn derivative(expr: &Expr, var: Var) -> Expr {
    differentiate(&simplify(expr), var)
}

/// Werkt op een expressie die al canoniek is.
pub(crate) fn differentiate(expr: &Expr, var: Var) -> Expr {
    if !expr.depends_on(var) {
        return Expr::Num(0.0);
    }
    match expr {
        Expr::Num(_) | Expr::Const(_) => Expr::Num(0.0),
        Expr::Var(v) => Expr::Num(if *v == var { 1.0 } else { 0.0 }),
        Expr::Add(terms) => add(terms.iter().map(|term| differentiate(term, var)).collect()),
        Expr::Mul(factors) => {
            let mut terms = Vec::new();
            for (index, factor) in factors.iter().enumerate() {
                if !factor.depends_on(var) {
                    continue;
                }
                let mut product: Vec<Expr> = factors
                    .iter()
                    .enumerate()
                    .filter(|(other, _)| *other != index)
                    .map(|(_, other)| other.clone())
                    .collect();
                product.push(differentiate(factor, var));
                terms.push(mul(product));
            }
            add(terms)
        }
        Expr::Pow(base, exponent) => differentiate_power(base, exponent, var),
        Expr::Func(func, arg) => mul(vec![outer_derivative(*func, arg), differentiate(arg, var)]),
    }
}

fn differentiate_power(base: &Expr, exponent: &Expr, var: Var) -> Expr {
    let base = base.clone();
    let exponent = exponent.clone();
    match (base.depends_on(var), exponent.depends_on(var)) {
        (false, false) => Expr::Num(0.0),
        // d(u^n) = n * u^(n-1) * u'
        (true, false) => {
            let lowered = pow(base.clone(), add(vec![exponent.clone(), Expr::Num(-1.0)]));
            mul(vec![exponent, lowered, differentiate(&base, var)])
        }
        // d(c^v) = c^v * ln(c) * v'
        (false, true) => {
            let d_exponent = differentiate(&exponent, var);
            mul(vec![
                pow(base.clone(), exponent),
                apply(Func::Ln, base),
                d_exponent,
            ])
        }
        // d(u^v) = u^v * (v' ln u + v u'/u)
        (true, true) => {
            let d_base = differentiate(&base, var);
            let d_exponent = differentiate(&exponent, var);
            let inner = add(vec![
                mul(vec![d_exponent, apply(Func::Ln, base.clone())]),
                mul(vec![exponent.clone(), d_base, pow(base.clone(), Expr::Num(-1.0))]),
            ]);
            mul(vec![pow(base, exponent), inner])
        }
    }
}

/// `f'(u)` voor een elementaire functie `f`.
fn outer_derivative(func: Func, arg: &Expr) -> Expr {
    let u = arg.clone();
    match func {
        Func::Sin => apply(Func::Cos, u),
        Func::Cos => mul(vec![Expr::Num(-1.0), apply(Func::Sin, u)]),
        Func::Tan => pow(apply(Func::Cos, u), Expr::Num(-2.0)),
        Func::Asin => pow(one_minus_square(&u), Expr::Num(-0.5)),
        Func::Acos => mul(vec![Expr::Num(-1.0), pow(one_minus_square(&u), Expr::Num(-0.5))]),
        Func::Atan => pow(add(vec![Expr::Num(1.0), pow(u, Expr::Num(2.0))]), Expr::Num(-1.0)),
        Func::Sinh => apply(Func::Cosh, u),
        Func::Cosh => apply(Func::Sinh, u),
        Func::Tanh => pow(apply(Func::Cosh, u), Expr::Num(-2.0)),
        Func::Exp => apply(Func::Exp, u),
        Func::Ln => pow(u, Expr::Num(-1.0)),
        Func::Abs => mul(vec![u.clone(), pow(apply(Func::Abs, u), Expr::Num(-1.0))]),
    }
}

fn one_minus_square(u: &Expr) -> Expr {
    add(vec![
        Expr::Num(1.0),
        mul(vec![Expr::Num(-1.0), pow(u.clone(), Expr::Num(2.0))]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::parse_expression;

    fn d(source: &str, var: Var) -> Expr {
        derivative(&parse_expression(source).expect("parse"), var)
    }

    fn canonical(source: &str) -> Expr {
        simplify(&parse_expression(source).expect("parse"))
    }

    #[test]
    fn differentiates_polynomials() {
        assert_eq!(d("x^3*y + 2*x*y^2 + 5*y", Var::X), canonical("3*x^2*y + 2*y^2"));
        assert_eq!(d("x^3*y + 2*x*y^2 + 5*y", Var::Y), canonical("x^3 + 4*x*y + 5"));
    }

    #[test]
    fn applies_the_chain_rule() {
        assert_eq!(d("sin(x*y)", Var::X), canonical("y*cos(x*y)"));
        assert_eq!(d("exp(x^2)", Var::X), canonical("2*x*exp(x^2)"));
    }

    #[test]
    fn independent_expressions_vanish() {
        assert_eq!(d("sin(y) + pi", Var::X), Expr::Num(0.0));
    }

    #[test]
    fn handles_variable_bases_and_exponents() {
        assert_eq!(d("2^x", Var::X), canonical("2^x*ln(2)"));
        assert_eq!(d("ln(x)", Var::X), canonical("1/x"));
    }
}
