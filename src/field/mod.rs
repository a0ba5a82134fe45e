//! Vectorvelden `F(x, y) = (P, Q)`: symbolische vorm, analyse en registry.

pub mod compile;
pub mod curl;
pub mod potential;
pub mod registry;

use serde::Serialize;
use thiserror::Error;

use crate::config::PotentialSettings;
use crate::grid::GridError;
use crate::symbolic::{Expr, ParseError, parse_expression, simplify};

pub use compile::{CompiledExpr, FieldEvaluator, Potential};
pub use curl::{CurlAnalysis, classify};
pub use registry::FieldRegistry;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("component {component} `{text}` kon niet geparst worden: {cause}")]
    Parse {
        component: &'static str,
        text: String,
        cause: ParseError,
    },
    #[error("veld kon niet geëvalueerd worden: {0}")]
    Evaluation(String),
    #[error("onbekend veld `{name}`{}", suggestion_hint(.suggestion))]
    UnknownField {
        name: String,
        suggestion: Option<String>,
    },
    #[error("veld `{0}` is al geregistreerd")]
    DuplicateName(String),
    #[error("veld `{0}` heeft geen beschikbare potentiaal")]
    PotentialUnavailable(String),
    #[error(transparent)]
    Grid(#[from] GridError),
}

fn suggestion_hint(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|name| format!(", bedoelde je `{name}`?"))
        .unwrap_or_default()
}

/// Een veld als paar canonieke expressies.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicField {
    p: Expr,
    q: Expr,
}

impl SymbolicField {
    #[must_use]
    pub fn new(p: Expr, q: Expr) -> Self {
        Self {
            p: simplify(&p),
            q: simplify(&q),
        }
    }

    /// Parseert beide componenten.
    pub fn parse(p: &str, q: &str) -> Result<Self, FieldError> {
        let parse_component = |component: &'static str, text: &str| {
            parse_expression(text).map_err(|cause| FieldError::Parse {
                component,
                text: text.to_owned(),
                cause,
            })
        };
        Ok(Self::new(parse_component("P", p)?, parse_component("Q", q)?))
    }

    #[must_use]
    pub fn p(&self) -> &Expr {
        &self.p
    }

    #[must_use]
    pub fn q(&self) -> &Expr {
        &self.q
    }
}

/// Uitkomst van de potentiaalreconstructie.
#[derive(Debug, Clone)]
pub enum PotentialState {
    /// De curl is niet identiek nul; er is geen potentiaal.
    NotConservative,
    Recovered(Potential),
    /// Conservatief, maar de symbolische reconstructie faalde.
    Unavailable { reason: String },
}

impl PotentialState {
    #[must_use]
    pub fn potential(&self) -> Option<&Potential> {
        match self {
            Self::Recovered(potential) => Some(potential),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }
}

/// Alles wat over een geregistreerd veld bekend is.
#[derive(Debug, Clone)]
pub struct FieldRecord {
    name: String,
    field: SymbolicField,
    evaluator: FieldEvaluator,
    curl: Expr,
    conservative: bool,
    potential: PotentialState,
}

impl FieldRecord {
    /// Classificeert, reconstrueert de potentiaal en compileert het veld.
    /// Faalt alleen als het veld zelf niet te evalueren is.
    pub fn analyze(
        name: impl Into<String>,
        field: SymbolicField,
        settings: &PotentialSettings,
    ) -> Result<Self, FieldError> {
        let name = name.into();
        let analysis = classify(&field);
        let potential = if analysis.conservative {
            potential::recover(&field, settings)
        } else {
            PotentialState::NotConservative
        };

        let evaluator = FieldEvaluator::compile(&field)?;
        evaluator.validate_at_origin()?;

        log::debug!(
            "veld `{name}` geanalyseerd: curl = {}, conservatief = {}",
            analysis.curl,
            analysis.conservative
        );
        Ok(Self {
            name,
            field,
            evaluator,
            curl: analysis.curl,
            conservative: analysis.conservative,
            potential,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field(&self) -> &SymbolicField {
        &self.field
    }

    #[must_use]
    pub fn evaluator(&self) -> &FieldEvaluator {
        &self.evaluator
    }

    #[must_use]
    pub fn curl(&self) -> &Expr {
        &self.curl
    }

    #[must_use]
    pub fn is_conservative(&self) -> bool {
        self.conservative
    }

    #[must_use]
    pub fn potential(&self) -> &PotentialState {
        &self.potential
    }

    #[must_use]
    pub fn summary(&self) -> FieldSummary {
        let (potential, potential_note) = match &self.potential {
            PotentialState::NotConservative => (None, None),
            PotentialState::Recovered(potential) => (Some(potential.expr().to_string()), None),
            PotentialState::Unavailable { reason } => (None, Some(reason.clone())),
        };
        FieldSummary {
            name: self.name.clone(),
            p: self.field.p().to_string(),
            q: self.field.q().to_string(),
            curl: self.curl.to_string(),
            conservative: self.conservative,
            potential,
            potential_note,
        }
    }
}

/// Serialiseerbare weergave van een [`FieldRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub p: String,
    pub q: String,
    pub curl: String,
    pub conservative: bool,
    pub potential: Option<String>,
    pub potential_note: Option<String>,
}
