//! Instellingen van de engine.
//!
//! Alle velden hebben een standaardwaarde, zodat een gedeeltelijke
//! configuratie (bijvoorbeeld vanuit JavaScript) geldig is.

use serde::{Deserialize, Serialize};

use crate::grid::{PlotWindow, ScalarArray};
use crate::work::Interval;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub integration: IntegrationSettings,
    pub sweep: SweepSettings,
    pub potential: PotentialSettings,
    /// Vormparameter `a` van de kwadratische familie als niets is opgegeven.
    pub default_shape: f64,
    pub quiver: GridSettings,
    pub surface: GridSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            integration: IntegrationSettings::default(),
            sweep: SweepSettings::default(),
            potential: PotentialSettings::default(),
            default_shape: 1.0,
            quiver: GridSettings {
                window: PlotWindow::square(-0.1, 1.2),
                density: 20,
            },
            surface: GridSettings {
                window: PlotWindow::square(-1.5, 1.5),
                density: 60,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationSettings {
    pub samples: usize,
    pub interval: Interval,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            samples: crate::work::DEFAULT_SAMPLES,
            interval: Interval::UNIT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSettings {
    pub min: f64,
    pub max: f64,
    /// Aantal waarden voor een weergegeven curve `W(a)`.
    pub display_steps: usize,
    /// Aantal waarden bij het zoeken naar het minimum.
    pub search_steps: usize,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            min: -2.0,
            max: 2.0,
            display_steps: 81,
            search_steps: 201,
        }
    }
}

impl SweepSettings {
    #[must_use]
    pub fn display_values(&self) -> Vec<f64> {
        crate::grid::linspace(self.min, self.max, self.display_steps)
    }

    #[must_use]
    pub fn search_values(&self) -> Vec<f64> {
        crate::grid::linspace(self.min, self.max, self.search_steps)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotentialSettings {
    /// Boven deze lengte (in tekens) wordt een potentiaal vereenvoudigd.
    pub simplify_threshold: usize,
}

impl Default for PotentialSettings {
    fn default() -> Self {
        Self {
            simplify_threshold: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub window: PlotWindow,
    pub density: usize,
}

impl GridSettings {
    #[must_use]
    pub fn sample(&self) -> (ScalarArray, ScalarArray) {
        self.window.sample(self.density)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = EngineConfig::default();
        assert_eq!(config.integration.samples, 2000);
        assert_eq!(config.integration.interval, Interval::UNIT);
        assert_eq!(config.sweep.display_values().len(), 81);
        assert_eq!(config.sweep.search_values().len(), 201);
        assert_eq!(config.potential.simplify_threshold, 200);
        assert_eq!(config.surface.sample().0.shape(), &[60, 60]);
    }
}
