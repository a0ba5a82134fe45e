//! Registry van benoemde velden, in volgorde van registratie.

use std::collections::HashMap;

use super::{FieldError, FieldRecord, SymbolicField};
use crate::config::PotentialSettings;
use crate::symbolic::Expr;

pub const BUILTIN_CONSERVATIVE: &str = "Conservative: F1(x,y) = (2x, 2y)";
pub const BUILTIN_ROTATIONAL: &str = "Non-conservative: F2(x,y) = (-y, x)";

/// Maximale bewerkingsafstand voor een naamsuggestie.
const MAX_SUGGESTION_DISTANCE: usize = 4;

#[derive(Debug, Default)]
pub struct FieldRegistry {
    records: Vec<FieldRecord>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry met de twee ingebouwde velden `(2x, 2y)` en `(-y, x)`.
    #[must_use]
    pub fn with_builtins(settings: &PotentialSettings) -> Self {
        let mut registry = Self::new();
        let builtins = [
            (
                BUILTIN_CONSERVATIVE,
                SymbolicField::new(
                    Expr::Mul(vec![Expr::Num(2.0), Expr::x()]),
                    Expr::Mul(vec![Expr::Num(2.0), Expr::y()]),
                ),
            ),
            (
                BUILTIN_ROTATIONAL,
                SymbolicField::new(Expr::Mul(vec![Expr::Num(-1.0), Expr::y()]), Expr::x()),
            ),
        ];
        for (name, field) in builtins {
            if let Err(error) = registry.register(name, field, settings) {
                log::error!("ingebouwd veld `{name}` kon niet geregistreerd worden: {error}");
            }
        }
        registry
    }

    /// Analyseert en registreert een veld. Bestaat de naam al, dan blijft de
    /// registry ongewijzigd en volgt [`FieldError::DuplicateName`].
    pub fn register(
        &mut self,
        name: &str,
        field: SymbolicField,
        settings: &PotentialSettings,
    ) -> Result<&FieldRecord, FieldError> {
        let key = normalize_name(name);
        if self.index.contains_key(&key) {
            return Err(FieldError::DuplicateName(name.to_owned()));
        }
        let record = FieldRecord::analyze(name.trim(), field, settings)?;
        log::info!("veld `{}` geregistreerd", record.name());
        let position = self.records.len();
        self.records.push(record);
        self.index.insert(key, position);
        Ok(&self.records[position])
    }

    pub fn lookup(&self, name: &str) -> Result<&FieldRecord, FieldError> {
        self.index
            .get(&normalize_name(name))
            .map(|&position| &self.records[position])
            .ok_or_else(|| FieldError::UnknownField {
                name: name.to_owned(),
                suggestion: self.suggest(name),
            })
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&normalize_name(name))
    }

    /// Namen in volgorde van registratie.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(FieldRecord::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Een vrije naam voor een nieuw veld. Zonder voorstel wordt de naam uit
    /// de componenten afgeleid; bij een botsing volgt een achtervoegsel ` (n)`.
    #[must_use]
    pub fn unique_name(&self, proposed: &str, p: &str, q: &str) -> String {
        let proposed = proposed.trim();
        let formula = format!("F(x,y) = ({}, {})", p.trim(), q.trim());
        let base = if proposed.is_empty() {
            formula
        } else if !self.contains(proposed) {
            return proposed.to_owned();
        } else {
            format!("{proposed}: {formula}")
        };
        if !self.contains(&base) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{base} ({suffix})");
            if !self.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn suggest(&self, name: &str) -> Option<String> {
        let wanted = normalize_name(name);
        self.records
            .iter()
            .map(|record| {
                let distance = levenshtein::levenshtein(&wanted, &normalize_name(record.name()));
                (distance, record.name())
            })
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate.to_owned())
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PotentialState;

    fn settings() -> PotentialSettings {
        PotentialSettings::default()
    }

    #[test]
    fn builtins_are_listed_in_order() {
        let registry = FieldRegistry::with_builtins(&settings());
        assert_eq!(registry.names(), vec![BUILTIN_CONSERVATIVE, BUILTIN_ROTATIONAL]);
        assert!(registry.lookup(BUILTIN_CONSERVATIVE).expect("builtin").is_conservative());
        assert!(!registry.lookup(BUILTIN_ROTATIONAL).expect("builtin").is_conservative());
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        let registry = FieldRegistry::with_builtins(&settings());
        let upper = BUILTIN_CONSERVATIVE.to_uppercase();
        assert!(registry.lookup(&format!("  {upper} ")).is_ok());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = FieldRegistry::new();
        let field = SymbolicField::parse("x", "y").expect("valid");
        registry.register("radial", field.clone(), &settings()).expect("first");
        let error = registry.register("Radial", field, &settings()).expect_err("duplicate");
        assert_eq!(error, FieldError::DuplicateName("Radial".to_owned()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_names_get_a_suggestion() {
        let mut registry = FieldRegistry::new();
        let field = SymbolicField::parse("x", "y").expect("valid");
        registry.register("radial", field, &settings()).expect("register");
        match registry.lookup("radail") {
            Err(FieldError::UnknownField { suggestion, .. }) => {
                assert_eq!(suggestion.as_deref(), Some("radial"));
            }
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn unique_names_avoid_collisions() {
        let mut registry = FieldRegistry::new();
        assert_eq!(registry.unique_name("", "x", "y"), "F(x,y) = (x, y)");
        assert_eq!(registry.unique_name("radial", "x", "y"), "radial");

        let field = SymbolicField::parse("x", "y").expect("valid");
        registry.register("radial", field.clone(), &settings()).expect("register");
        let second = registry.unique_name("radial", "x", "y");
        assert_eq!(second, "radial: F(x,y) = (x, y)");
        registry.register(&second, field, &settings()).expect("register");
        assert_eq!(registry.unique_name("radial", "x", "y"), "radial: F(x,y) = (x, y) (2)");
    }

    #[test]
    fn every_conservative_record_has_a_potential_state() {
        let mut registry = FieldRegistry::with_builtins(&settings());
        let field = SymbolicField::parse("exp(x^2)", "0").expect("valid");
        registry.register("gauss", field, &settings()).expect("register");
        for record in registry.iter() {
            match (record.is_conservative(), record.potential()) {
                (false, PotentialState::NotConservative) => {}
                (true, PotentialState::Recovered(_) | PotentialState::Unavailable { .. }) => {}
                (conservative, state) => panic!("{}: {conservative} with {state:?}", record.name()),
            }
        }
    }
}
