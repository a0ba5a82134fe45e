//! Parser voor veldcomponenten.
//!
//! De tekst wordt eerst genormaliseerd (`**` wordt `^`, impliciete
//! vermenigvuldiging zoals `2x` wordt `2*x`), daarna door de tokenizer en
//! shunting-yard van `meval` gehaald. De RPN-reeks wordt vervolgens omgezet in
//! een [`Expr`]. Alleen `x`, `y`, `pi` en `e` zijn geldige symbolen.

use std::sync::OnceLock;

use meval::shunting_yard::to_rpn;
use meval::tokenizer::{Operation, Token, tokenize};
use regex::Regex;
use thiserror::Error;

use super::{Constant, Expr, Func, Var};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("lege expressie")]
    Empty,
    #[error("syntaxfout: {0}")]
    Syntax(String),
    #[error("onbekend symbool `{0}` (toegestaan: x, y, pi, e)")]
    UnknownSymbol(String),
    #[error("onbekende functie `{0}`")]
    UnknownFunction(String),
    #[error("functie `{name}` verwacht 1 argument, kreeg er {given}")]
    Arity { name: String, given: usize },
    #[error("operator `{0}` wordt niet ondersteund")]
    UnsupportedOperator(String),
}

/// Parseert een componenttekst zoals `"2*x + sin(y)"` naar een (niet
/// vereenvoudigde) expressie.
pub fn parse_expression(source: &str) -> Result<Expr, ParseError> {
    let normalized = normalize_expression(source);
    if normalized.is_empty() {
        return Err(ParseError::Empty);
    }

    let tokens = tokenize(&normalized).map_err(|error| ParseError::Syntax(error.to_string()))?;
    let rpn = to_rpn(&tokens).map_err(|error| ParseError::Syntax(error.to_string()))?;
    fold_rpn(&rpn)
}

fn normalize_expression(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let mut normalized = trimmed.replace("**", "^").replace('π', "pi");
    while normalized.ends_with(';') {
        normalized.pop();
        normalized = normalized.trim_end().to_owned();
    }

    if let Some(pattern) = number_product() {
        normalized = pattern.replace_all(&normalized, "${1}*${2}").into_owned();
    }
    if let Some(pattern) = closing_product() {
        normalized = pattern.replace_all(&normalized, ")*${1}").into_owned();
    }
    normalized
}

/// `2x`, `3 sin(y)`, `4(x + 1)`, `2exp(x)`; een losse `e` direct na een cijfer
/// blijft een exponent.
fn number_product() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(\d)\s*(exp\b|[a-df-zA-DF-Z_(])").ok())
        .as_ref()
}

/// `(x + 1)(x - 1)`, `(x)y`.
fn closing_product() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\)\s*([A-Za-z_(\d])").ok())
        .as_ref()
}

fn fold_rpn(rpn: &[Token]) -> Result<Expr, ParseError> {
    let mut stack: Vec<Expr> = Vec::with_capacity(rpn.len());
    for token in rpn {
        let expr = match token {
            Token::Number(value) => Expr::Num(*value),
            Token::Var(name) => symbol(name)?,
            Token::Unary(operation) => {
                let operand = pop_operand(&mut stack)?;
                match operation {
                    Operation::Plus => operand,
                    Operation::Minus => Expr::Mul(vec![Expr::Num(-1.0), operand]),
                    other => return Err(unsupported(*other)),
                }
            }
            Token::Binary(operation) => {
                let rhs = pop_operand(&mut stack)?;
                let lhs = pop_operand(&mut stack)?;
                match operation {
                    Operation::Plus => Expr::Add(vec![lhs, rhs]),
                    Operation::Minus => {
                        Expr::Add(vec![lhs, Expr::Mul(vec![Expr::Num(-1.0), rhs])])
                    }
                    Operation::Times => Expr::Mul(vec![lhs, rhs]),
                    Operation::Div => {
                        Expr::Mul(vec![lhs, Expr::Pow(Box::new(rhs), Box::new(Expr::Num(-1.0)))])
                    }
                    Operation::Pow => Expr::Pow(Box::new(lhs), Box::new(rhs)),
                    other => return Err(unsupported(*other)),
                }
            }
            Token::Func(name, arity) => {
                let given = arity.unwrap_or(0);
                let is_sqrt = name == "sqrt";
                let func = Func::from_name(name);
                if func.is_none() && !is_sqrt {
                    return Err(ParseError::UnknownFunction(name.clone()));
                }
                if given != 1 {
                    return Err(ParseError::Arity {
                        name: name.clone(),
                        given,
                    });
                }
                let arg = pop_operand(&mut stack)?;
                match func {
                    Some(func) => Expr::Func(func, Box::new(arg)),
                    None => Expr::Pow(Box::new(arg), Box::new(Expr::Num(0.5))),
                }
            }
            other => return Err(ParseError::Syntax(format!("onverwacht token {other:?}"))),
        };
        stack.push(expr);
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(expr), true) => Ok(expr),
        _ => Err(ParseError::Syntax("onvolledige expressie".to_owned())),
    }
}

fn pop_operand(stack: &mut Vec<Expr>) -> Result<Expr, ParseError> {
    stack
        .pop()
        .ok_or_else(|| ParseError::Syntax("operand ontbreekt".to_owned()))
}

fn symbol(name: &str) -> Result<Expr, ParseError> {
    match name {
        "x" | "X" => Ok(Expr::Var(Var::X)),
        "y" | "Y" => Ok(Expr::Var(Var::Y)),
        "pi" | "PI" | "Pi" => Ok(Expr::Const(Constant::Pi)),
        "e" => Ok(Expr::Const(Constant::E)),
        other => Err(ParseError::UnknownSymbol(other.to_owned())),
    }
}

fn unsupported(operation: Operation) -> ParseError {
    let symbol = match operation {
        Operation::Rem => "%".to_owned(),
        other => format!("{other:?}"),
    };
    ParseError::UnsupportedOperator(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::simplify;

    fn canonical(source: &str) -> Expr {
        simplify(&parse_expression(source).expect("parse"))
    }

    #[test]
    fn parses_basic_arithmetic() {
        let expr = parse_expression("2*x - y/3").expect("parse");
        assert_eq!(simplify(&expr).to_string(), "2*x - 0.3333333333333333*y");
    }

    #[test]
    fn accepts_python_style_powers_and_implicit_products() {
        assert_eq!(canonical("x**2"), canonical("x^2"));
        assert_eq!(canonical("2x"), canonical("2*x"));
        assert_eq!(canonical("(x + 1)(x - 1)"), canonical("x^2 - 1"));
        assert_eq!(canonical("3 sin(y)"), canonical("3*sin(y)"));
        assert_eq!(canonical("2exp(x)"), canonical("2*exp(x)"));
    }

    #[test]
    fn reads_constants_and_functions() {
        assert_eq!(canonical("pi"), Expr::Const(Constant::Pi));
        assert_eq!(canonical("e^x"), canonical("exp(x)"));
        assert_eq!(canonical("sqrt(x)"), Expr::Pow(Box::new(Expr::x()), Box::new(Expr::Num(0.5))));
        assert_eq!(canonical("log(x)"), canonical("ln(x)"));
    }

    #[test]
    fn strips_trailing_semicolons() {
        assert_eq!(canonical("x + y;"), canonical("x + y"));
    }

    #[test]
    fn rejects_unknown_symbols() {
        assert_eq!(
            parse_expression("x + z"),
            Err(ParseError::UnknownSymbol("z".to_owned()))
        );
        assert_eq!(
            parse_expression("foo(x)"),
            Err(ParseError::UnknownFunction("foo".to_owned()))
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse_expression("   "), Err(ParseError::Empty));
        assert!(matches!(parse_expression("x +"), Err(ParseError::Syntax(_))));
        assert!(matches!(parse_expression("(x"), Err(ParseError::Syntax(_))));
        assert!(matches!(
            parse_expression("x % 2"),
            Err(ParseError::UnsupportedOperator(_))
        ));
        assert!(matches!(parse_expression("x!"), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn checks_function_arity() {
        assert!(matches!(
            parse_expression("sin(x, y)"),
            Err(ParseError::Arity { given: 2, .. })
        ));
    }
}
