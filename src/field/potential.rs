//! Reconstructie van een potentiaal `f` met `∇f = (P, Q)`.
//!
//! 1. `F1 = ∫ P dx`
//! 2. `G = ∂F1/∂y`
//! 3. `R = Q - G` (hangt voor een conservatief veld alleen van `y` af)
//! 4. `C = ∫ R dy`
//! 5. `f = F1 + C`, alleen vereenvoudigd als de tekst langer is dan de drempel

use thiserror::Error;

use super::{FieldError, Potential, PotentialState, SymbolicField};
use crate::config::PotentialSettings;
use crate::symbolic::simplify::add;
use crate::symbolic::{Expr, IntegrationError, Var, antiderivative, derivative, simplify};

#[derive(Debug, Error)]
enum RecoveryError {
    #[error(transparent)]
    Integration(#[from] IntegrationError),
    #[error(transparent)]
    Compile(#[from] FieldError),
    #[error("potentiaal is niet eindig in de oorsprong ({0})")]
    NotFinite(f64),
}

/// Probeert de potentiaal van een (als conservatief geclassificeerd) veld te
/// vinden. Een mislukking wordt gelogd en als `Unavailable` teruggegeven.
#[must_use]
pub fn recover(field: &SymbolicField, settings: &PotentialSettings) -> PotentialState {
    match try_recover(field, settings) {
        Ok(potential) => PotentialState::Recovered(potential),
        Err(error) => {
            log::warn!("potentiaal niet beschikbaar: {error}");
            PotentialState::Unavailable {
                reason: error.to_string(),
            }
        }
    }
}

fn try_recover(
    field: &SymbolicField,
    settings: &PotentialSettings,
) -> Result<Potential, RecoveryError> {
    let partial = antiderivative(field.p(), Var::X)?;
    let expected_q = derivative(&partial, Var::Y);
    let residual = add(vec![field.q().clone(), -expected_q]);
    let correction = antiderivative(&residual, Var::Y)?;

    let combined = if correction.is_zero() {
        partial
    } else {
        Expr::Add(vec![partial, correction])
    };
    let expr = if combined.to_string().len() > settings.simplify_threshold {
        simplify(&combined)
    } else {
        combined
    };

    let potential = Potential::compile(expr)?;
    let at_origin = potential.eval(0.0, 0.0);
    if !at_origin.is_finite() {
        return Err(RecoveryError::NotFinite(at_origin));
    }
    Ok(potential)
}
