//! Symbolische expressies over de reële variabelen `x` en `y`.
//!
//! Een [`Expr`] is een onveranderlijke boom. Aftrekken en delen bestaan niet als
//! aparte knopen: `a - b` wordt `a + (-1)*b` en `a / b` wordt `a * b^(-1)`.
//! De functies in [`simplify`] bouwen canonieke vormen op; [`diff`] en
//! [`integrate`] werken uitsluitend op die canonieke vormen.

use std::fmt;

pub mod diff;
pub mod integrate;
pub mod parse;
pub mod simplify;

pub use diff::derivative;
pub use integrate::{IntegrationError, antiderivative};
pub use parse::{ParseError, parse_expression};
pub use simplify::simplify;

/// De twee formele variabelen van een veld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Var {
    X,
    Y,
}

impl Var {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Benoemde constanten die in veldexpressies gebruikt mogen worden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Toegestane elementaire functies (één argument).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Abs,
}

impl Func {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Ln => "ln",
            Self::Abs => "abs",
        }
    }

    /// Zoekt een functie op naam. `log` is de natuurlijke logaritme.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let func = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" | "arcsin" => Self::Asin,
            "acos" | "arccos" => Self::Acos,
            "atan" | "arctan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "ln" | "log" => Self::Ln,
            "abs" => Self::Abs,
            _ => return None,
        };
        Some(func)
    }

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Sin => value.sin(),
            Self::Cos => value.cos(),
            Self::Tan => value.tan(),
            Self::Asin => value.asin(),
            Self::Acos => value.acos(),
            Self::Atan => value.atan(),
            Self::Sinh => value.sinh(),
            Self::Cosh => value.cosh(),
            Self::Tanh => value.tanh(),
            Self::Exp => value.exp(),
            Self::Ln => value.ln(),
            Self::Abs => value.abs(),
        }
    }
}

impl fmt::Display for Func {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Symbolische scalaire expressie.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(f64),
    Var(Var),
    Const(Constant),
    Add(Vec<Expr>),
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    Func(Func, Box<Expr>),
}

impl Expr {
    #[must_use]
    pub const fn x() -> Self {
        Self::Var(Var::X)
    }

    #[must_use]
    pub const fn y() -> Self {
        Self::Var(Var::Y)
    }

    #[must_use]
    pub const fn num(value: f64) -> Self {
        Self::Num(value)
    }

    /// Geeft de numerieke waarde terug als de expressie een getal is.
    #[must_use]
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(value) => Some(*value),
            _ => None,
        }
    }

    /// Structureel nul: alleen de letterlijke `0`.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Num(value) if *value == 0.0)
    }

    #[must_use]
    pub fn depends_on(&self, var: Var) -> bool {
        match self {
            Self::Num(_) | Self::Const(_) => false,
            Self::Var(v) => *v == var,
            Self::Add(items) | Self::Mul(items) => items.iter().any(|item| item.depends_on(var)),
            Self::Pow(base, exponent) => base.depends_on(var) || exponent.depends_on(var),
            Self::Func(_, arg) => arg.depends_on(var),
        }
    }

    /// Volledig gehaakte weergave in de syntax van `meval`; dit is de invoer
    /// van de compileerstap.
    #[must_use]
    pub fn to_meval_source(&self) -> String {
        match self {
            Self::Num(value) => meval_number(*value),
            Self::Var(var) => var.name().to_owned(),
            Self::Const(constant) => constant.name().to_owned(),
            Self::Add(terms) => join_meval(terms, " + "),
            Self::Mul(factors) => join_meval(factors, " * "),
            Self::Pow(base, exponent) => format!(
                "(({})^({}))",
                base.to_meval_source(),
                exponent.to_meval_source()
            ),
            Self::Func(func, arg) => format!("{}({})", func.name(), arg.to_meval_source()),
        }
    }
}

fn meval_number(value: f64) -> String {
    if value.is_nan() {
        "(0/0)".to_owned()
    } else if value.is_infinite() {
        if value > 0.0 { "(1/0)" } else { "(-1/0)" }.to_owned()
    } else if value < 0.0 {
        format!("({value})")
    } else {
        format!("{value}")
    }
}

fn join_meval(items: &[Expr], separator: &str) -> String {
    let parts: Vec<String> = items.iter().map(Expr::to_meval_source).collect();
    format!("({})", parts.join(separator))
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        simplify::add(vec![self, rhs])
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        simplify::add(vec![self, simplify::mul(vec![Self::Num(-1.0), rhs])])
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        simplify::mul(vec![self, rhs])
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        simplify::mul(vec![self, simplify::pow(rhs, Self::Num(-1.0))])
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        simplify::mul(vec![Self::Num(-1.0), self])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Weergave
// ─────────────────────────────────────────────────────────────────────────────

const PREC_SUM: u8 = 1;
const PREC_PRODUCT: u8 = 2;
const PREC_POWER: u8 = 3;
const PREC_ATOM: u8 = 4;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Num(value) if *value < 0.0 => PREC_SUM,
        Expr::Add(_) => PREC_SUM,
        Expr::Mul(_) => PREC_PRODUCT,
        Expr::Pow(_, exponent) if exponent.as_num() == Some(0.5) => PREC_ATOM,
        Expr::Pow(_, exponent) if exponent.as_num().is_some_and(|e| e < 0.0) => PREC_PRODUCT,
        Expr::Pow(..) => PREC_POWER,
        _ => PREC_ATOM,
    }
}

struct Wrapped<'a>(&'a Expr, u8);

impl fmt::Display for Wrapped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if precedence(self.0) < self.1 {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Levert `-term` op als de term een negatief teken draagt.
fn negated(term: &Expr) -> Option<Expr> {
    match term {
        Expr::Num(value) if *value < 0.0 => Some(Expr::Num(-value)),
        Expr::Mul(factors) => match factors.first() {
            Some(Expr::Num(coefficient)) if *coefficient < 0.0 => {
                let mut rest: Vec<Expr> = factors[1..].to_vec();
                if *coefficient != -1.0 {
                    rest.insert(0, Expr::Num(-coefficient));
                }
                Some(if rest.len() == 1 {
                    rest.remove(0)
                } else {
                    Expr::Mul(rest)
                })
            }
            _ => None,
        },
        _ => None,
    }
}

fn write_product(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    let mut coefficient = 1.0;
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    for factor in factors {
        match factor {
            Expr::Num(value) => coefficient *= value,
            Expr::Pow(base, exponent) if exponent.as_num().is_some_and(|e| e < 0.0) => {
                let positive = -exponent.as_num().unwrap_or(-1.0);
                if positive == 1.0 {
                    denominator.push((**base).clone());
                } else {
                    denominator.push(Expr::Pow(base.clone(), Box::new(Expr::Num(positive))));
                }
            }
            other => numerator.push(other.clone()),
        }
    }

    if coefficient < 0.0 {
        f.write_str("-")?;
    }
    let magnitude = coefficient.abs();
    let mut first = true;
    if magnitude != 1.0 || numerator.is_empty() {
        write!(f, "{magnitude}")?;
        first = false;
    }
    for factor in &numerator {
        if !first {
            f.write_str("*")?;
        }
        write!(f, "{}", Wrapped(factor, PREC_PRODUCT + 1))?;
        first = false;
    }

    match denominator.as_slice() {
        [] => Ok(()),
        [single] => write!(f, "/{}", Wrapped(single, PREC_POWER)),
        several => {
            f.write_str("/(")?;
            for (index, factor) in several.iter().enumerate() {
                if index > 0 {
                    f.write_str("*")?;
                }
                write!(f, "{}", Wrapped(factor, PREC_PRODUCT + 1))?;
            }
            f.write_str(")")
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(value) => write!(f, "{value}"),
            Self::Var(var) => write!(f, "{var}"),
            Self::Const(constant) => write!(f, "{constant}"),
            Self::Add(terms) => {
                for (index, term) in terms.iter().enumerate() {
                    match (index, negated(term)) {
                        (0, Some(positive)) => write!(f, "-{}", Wrapped(&positive, PREC_PRODUCT))?,
                        (0, None) => write!(f, "{term}")?,
                        (_, Some(positive)) => {
                            write!(f, " - {}", Wrapped(&positive, PREC_PRODUCT))?;
                        }
                        (_, None) => write!(f, " + {term}")?,
                    }
                }
                Ok(())
            }
            Self::Mul(factors) => write_product(f, factors),
            Self::Pow(base, exponent) => match exponent.as_num() {
                Some(e) if e == 0.5 => write!(f, "sqrt({base})"),
                Some(e) if e < 0.0 => write_product(f, std::slice::from_ref(self)),
                _ => write!(
                    f,
                    "{}^{}",
                    Wrapped(base, PREC_ATOM),
                    Wrapped(exponent, PREC_ATOM)
                ),
            },
            Self::Func(func, arg) => write!(f, "{func}({arg})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_canonical_polynomial() {
        let expr = Expr::x() * Expr::x() + Expr::y() * Expr::y();
        assert_eq!(expr.to_string(), "x^2 + y^2");
    }

    #[test]
    fn displays_negative_terms_and_quotients() {
        let expr = Expr::num(2.0) * Expr::x() - Expr::y() / Expr::x();
        assert_eq!(expr.to_string(), "2*x - y/x");
        assert_eq!((-Expr::y()).to_string(), "-y");
    }

    #[test]
    fn meval_source_is_fully_parenthesized() {
        let expr = Expr::Add(vec![
            Expr::Num(-2.0),
            Expr::Pow(Box::new(Expr::x()), Box::new(Expr::Num(2.0))),
        ]);
        assert_eq!(expr.to_meval_source(), "((-2) + ((x)^(2)))");
    }

    #[test]
    fn dependency_tracks_nested_arguments() {
        let expr = Expr::Func(Func::Sin, Box::new(Expr::x() * Expr::y()));
        assert!(expr.depends_on(Var::X));
        assert!(expr.depends_on(Var::Y));
        assert!(!Expr::Const(Constant::Pi).depends_on(Var::X));
    }

    #[test]
    fn resolves_function_aliases() {
        assert_eq!(Func::from_name("log"), Some(Func::Ln));
        assert_eq!(Func::from_name("arctan"), Some(Func::Atan));
        assert_eq!(Func::from_name("gamma"), None);
    }
}
