//! Canonicalisering van symbolische expressies.
//!
//! De slimme constructors [`add`], [`mul`], [`pow`] en [`apply`] verwachten
//! canonieke kinderen en leveren weer een canonieke vorm op:
//!
//! - sommen en producten zijn plat, gesorteerd en bevatten hooguit één getal
//!   (de constante term of de coëfficiënt, die bij producten vooraan staat);
//! - gelijke monomen worden samengenomen, gelijke grondtallen ook;
//! - producten met sommen worden uitgewerkt zolang het resultaat klein blijft.
//!
//! Twee expressies die algebraïsch gelijk zijn hoeven niet dezelfde vorm te
//! krijgen; het omgekeerde geldt wel.

use std::cmp::Ordering;

use super::{Constant, Expr, Func};

/// Een som die kleiner is dan deze fractie van zijn grootste term telt als nul.
const CANCELLATION_TOLERANCE: f64 = 1e-12;
const MAX_EXPANDED_POWER: f64 = 6.0;
const MAX_EXPANDED_TERMS: usize = 512;

/// Brengt een willekeurige (bijvoorbeeld net geparste) expressie in canonieke vorm.
#[must_use]
pub fn simplify(expr: &Expr) -> Expr {
    match expr {
        Expr::Num(value) => Expr::Num(normalize_zero(*value)),
        Expr::Var(_) | Expr::Const(_) => expr.clone(),
        Expr::Add(terms) => add(terms.iter().map(simplify).collect()),
        Expr::Mul(factors) => mul(factors.iter().map(simplify).collect()),
        Expr::Pow(base, exponent) => pow(simplify(base), simplify(exponent)),
        Expr::Func(func, arg) => apply(*func, simplify(arg)),
    }
}

#[must_use]
pub fn add(terms: Vec<Expr>) -> Expr {
    let mut constant = 0.0;
    let mut constant_scale: f64 = 0.0;
    // (monoom, som van coëfficiënten, grootste coëfficiënt in absolute waarde)
    let mut groups: Vec<(Expr, f64, f64)> = Vec::new();

    let mut pending = terms;
    pending.reverse();
    while let Some(term) = pending.pop() {
        match term {
            Expr::Num(value) => {
                constant += value;
                constant_scale = constant_scale.max(value.abs());
            }
            Expr::Add(inner) => pending.extend(inner.into_iter().rev()),
            other => {
                let (coefficient, monomial) = split_coefficient(other);
                match groups.iter_mut().find(|(existing, _, _)| *existing == monomial) {
                    Some((_, sum, scale)) => {
                        *sum += coefficient;
                        *scale = scale.max(coefficient.abs());
                    }
                    None => groups.push((monomial, coefficient, coefficient.abs())),
                }
            }
        }
    }

    let mut result: Vec<Expr> = groups
        .into_iter()
        .filter(|(_, sum, scale)| !cancels(*sum, *scale))
        .map(|(monomial, sum, _)| with_coefficient(sum, monomial))
        .collect();
    result.sort_by(compare_terms);
    if !cancels(constant, constant_scale) {
        result.push(Expr::Num(normalize_zero(constant)));
    }

    match result.len() {
        0 => Expr::Num(0.0),
        1 => result.remove(0),
        _ => Expr::Add(result),
    }
}

#[must_use]
pub fn mul(factors: Vec<Expr>) -> Expr {
    let mut coefficient = 1.0;
    let mut groups: Vec<(Expr, Vec<Expr>)> = Vec::new();

    let mut pending = factors;
    pending.reverse();
    while let Some(factor) = pending.pop() {
        match factor {
            Expr::Num(value) => coefficient *= value,
            Expr::Mul(inner) => pending.extend(inner.into_iter().rev()),
            other => {
                let (base, exponent) = split_power(other);
                match groups.iter_mut().find(|(existing, _)| *existing == base) {
                    Some((_, exponents)) => exponents.push(exponent),
                    None => groups.push((base, vec![exponent])),
                }
            }
        }
    }
    if coefficient == 0.0 {
        return Expr::Num(0.0);
    }

    let mut rest = Vec::new();
    let mut regroup = false;
    for (base, mut exponents) in groups {
        let exponent = if exponents.len() == 1 {
            exponents.remove(0)
        } else {
            add(exponents)
        };
        match pow(base, exponent) {
            Expr::Num(value) => coefficient *= value,
            Expr::Mul(inner) => {
                regroup = true;
                rest.extend(inner);
            }
            other => rest.push(other),
        }
    }
    if regroup {
        rest.push(Expr::Num(coefficient));
        return mul(rest);
    }
    if coefficient == 0.0 {
        return Expr::Num(0.0);
    }

    let (sums, mut others): (Vec<Expr>, Vec<Expr>) =
        rest.into_iter().partition(|factor| matches!(factor, Expr::Add(_)));
    if !sums.is_empty() && expansion_size(&sums) <= MAX_EXPANDED_TERMS {
        let mut product = finish_product(coefficient, others);
        for sum in &sums {
            product = expand_product(&product, sum);
        }
        return product;
    }
    others.extend(sums);
    finish_product(coefficient, others)
}

#[must_use]
pub fn pow(base: Expr, exponent: Expr) -> Expr {
    match (&base, &exponent) {
        (_, Expr::Num(e)) if *e == 0.0 => return Expr::Num(1.0),
        (_, Expr::Num(e)) if *e == 1.0 => return base,
        (Expr::Num(b), _) if *b == 1.0 => return Expr::Num(1.0),
        (Expr::Num(b), Expr::Num(e)) => {
            let value = b.powf(*e);
            if value.is_finite() && (*b >= 0.0 || is_integer(*e)) {
                return Expr::Num(normalize_zero(value));
            }
        }
        _ => {}
    }

    let integer_exponent = exponent.as_num().filter(|e| is_integer(*e));
    match base {
        Expr::Const(Constant::E) => apply(Func::Exp, exponent),
        Expr::Func(Func::Exp, arg) => apply(Func::Exp, mul(vec![*arg, exponent])),
        Expr::Pow(inner_base, inner_exponent) if integer_exponent.is_some() => {
            pow(*inner_base, mul(vec![*inner_exponent, exponent]))
        }
        Expr::Mul(factors) if integer_exponent.is_some() => mul(factors
            .into_iter()
            .map(|factor| pow(factor, exponent.clone()))
            .collect()),
        Expr::Add(terms)
            if integer_exponent.is_some_and(|n| (2.0..=MAX_EXPANDED_POWER).contains(&n))
                && terms.len().saturating_pow(integer_exponent.unwrap_or(0.0) as u32)
                    <= MAX_EXPANDED_TERMS =>
        {
            let sum = Expr::Add(terms);
            let times = integer_exponent.unwrap_or(1.0) as usize;
            let mut product = sum.clone();
            for _ in 1..times {
                product = expand_product(&product, &sum);
            }
            product
        }
        base => Expr::Pow(Box::new(base), Box::new(exponent)),
    }
}

#[must_use]
pub fn apply(func: Func, arg: Expr) -> Expr {
    if let Expr::Num(value) = arg {
        let result = func.apply(value);
        if result.is_finite() {
            return Expr::Num(normalize_zero(result));
        }
    }
    match (func, arg) {
        (Func::Exp, Expr::Func(Func::Ln, inner)) => *inner,
        (Func::Ln, Expr::Func(Func::Exp, inner)) => *inner,
        (Func::Abs, Expr::Func(Func::Abs, inner)) => Expr::Func(Func::Abs, inner),
        (func, arg) => Expr::Func(func, Box::new(arg)),
    }
}

/// Termen van een som, of de expressie zelf als enige term.
pub(crate) fn terms_of(expr: &Expr) -> &[Expr] {
    match expr {
        Expr::Add(terms) => terms,
        other => std::slice::from_ref(other),
    }
}

/// Factoren van een product, of de expressie zelf als enige factor.
pub(crate) fn factors_of(expr: &Expr) -> &[Expr] {
    match expr {
        Expr::Mul(factors) => factors,
        other => std::slice::from_ref(other),
    }
}

pub(crate) fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

fn cancels(sum: f64, scale: f64) -> bool {
    sum == 0.0 || sum.abs() <= CANCELLATION_TOLERANCE * scale
}

fn split_coefficient(term: Expr) -> (f64, Expr) {
    match term {
        Expr::Mul(mut factors) => match factors.first() {
            Some(Expr::Num(coefficient)) => {
                let coefficient = *coefficient;
                factors.remove(0);
                let monomial = if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Expr::Mul(factors)
                };
                (coefficient, monomial)
            }
            _ => (1.0, Expr::Mul(factors)),
        },
        other => (1.0, other),
    }
}

fn with_coefficient(coefficient: f64, monomial: Expr) -> Expr {
    if coefficient == 1.0 {
        return monomial;
    }
    match monomial {
        Expr::Mul(mut factors) => {
            factors.insert(0, Expr::Num(coefficient));
            Expr::Mul(factors)
        }
        other => Expr::Mul(vec![Expr::Num(coefficient), other]),
    }
}

fn split_power(factor: Expr) -> (Expr, Expr) {
    match factor {
        Expr::Pow(base, exponent) => (*base, *exponent),
        Expr::Func(Func::Exp, arg) => (Expr::Const(Constant::E), *arg),
        other => (other, Expr::Num(1.0)),
    }
}

fn finish_product(coefficient: f64, mut factors: Vec<Expr>) -> Expr {
    factors.sort_by(compare_factors);
    if factors.is_empty() {
        return Expr::Num(normalize_zero(coefficient));
    }
    if coefficient != 1.0 {
        factors.insert(0, Expr::Num(coefficient));
    }
    if factors.len() == 1 {
        factors.remove(0)
    } else {
        Expr::Mul(factors)
    }
}

fn expansion_size(sums: &[Expr]) -> usize {
    sums.iter()
        .fold(1usize, |size, sum| size.saturating_mul(terms_of(sum).len()))
}

fn expand_product(left: &Expr, right: &Expr) -> Expr {
    let left_terms = terms_of(left);
    let right_terms = terms_of(right);
    let mut products = Vec::with_capacity(left_terms.len() * right_terms.len());
    for a in left_terms {
        for b in right_terms {
            products.push(mul(vec![a.clone(), b.clone()]));
        }
    }
    add(products)
}

fn rank(expr: &Expr) -> u8 {
    match expr {
        Expr::Num(_) => 0,
        Expr::Const(_) => 1,
        Expr::Var(_) => 2,
        Expr::Func(..) => 3,
        Expr::Pow(..) => 4,
        Expr::Mul(_) => 5,
        Expr::Add(_) => 6,
    }
}

/// Totale ordening op expressies, gebruikt om sommen en producten te sorteren.
#[must_use]
pub fn canonical_cmp(a: &Expr, b: &Expr) -> Ordering {
    match (a, b) {
        (Expr::Num(left), Expr::Num(right)) => left.total_cmp(right),
        (Expr::Const(left), Expr::Const(right)) => left.cmp(right),
        (Expr::Var(left), Expr::Var(right)) => left.cmp(right),
        (Expr::Func(f, left), Expr::Func(g, right)) => {
            f.cmp(g).then_with(|| canonical_cmp(left, right))
        }
        (Expr::Pow(b1, e1), Expr::Pow(b2, e2)) => {
            canonical_cmp(b1, b2).then_with(|| canonical_cmp(e1, e2))
        }
        (Expr::Mul(left), Expr::Mul(right)) | (Expr::Add(left), Expr::Add(right)) => {
            compare_slices(left, right)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn compare_slices(left: &[Expr], right: &[Expr]) -> Ordering {
    for (a, b) in left.iter().zip(right) {
        let ordering = canonical_cmp(a, b);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    left.len().cmp(&right.len())
}

fn compare_factors(a: &Expr, b: &Expr) -> Ordering {
    let (base_a, exponent_a) = power_parts(a);
    let (base_b, exponent_b) = power_parts(b);
    canonical_cmp(base_a, base_b).then_with(|| match (exponent_a, exponent_b) {
        (Some(left), Some(right)) => canonical_cmp(left, right),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    })
}

fn power_parts(expr: &Expr) -> (&Expr, Option<&Expr>) {
    match expr {
        Expr::Pow(base, exponent) => (base, Some(exponent)),
        other => (other, None),
    }
}

fn compare_terms(a: &Expr, b: &Expr) -> Ordering {
    let (coefficient_a, monomial_a) = coefficient_parts(a);
    let (coefficient_b, monomial_b) = coefficient_parts(b);
    compare_slices(monomial_a, monomial_b).then_with(|| coefficient_a.total_cmp(&coefficient_b))
}

fn coefficient_parts(term: &Expr) -> (f64, &[Expr]) {
    match term {
        Expr::Mul(factors) => match factors.split_first() {
            Some((Expr::Num(coefficient), rest)) => (*coefficient, rest),
            _ => (1.0, factors),
        },
        other => (1.0, std::slice::from_ref(other)),
    }
}
