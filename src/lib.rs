#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod field;
pub mod grid;
pub mod path;
pub mod symbolic;
pub mod work;

use std::fmt;

use config::EngineConfig;
use field::{FieldError, FieldRecord, FieldRegistry, FieldSummary, SymbolicField};
use grid::{GridError, PlotWindow, Point2, PointArray, ScalarArray, stack_points};
use path::{Path2, PathKind, PathSpec, UnknownPathKind};
use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use work::{SweepPoint, VectorField, WorkError};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

/// Fouten op het niveau van de engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Work(#[from] WorkError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Path(#[from] UnknownPathKind),
    #[error("punt verwacht twee coördinaten, kreeg er {0}")]
    PointArity(usize),
}

/// Pijlenveld op een rooster, klaar om te tekenen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuiverData {
    pub shape: Vec<usize>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

/// Potentiaal `z = f(x, y)` op een rooster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceData {
    pub shape: Vec<usize>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct RegisteredField<'a> {
    name: &'a str,
    summary: FieldSummary,
}

#[derive(Debug, Serialize)]
struct SweepExport {
    points: Vec<SweepPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<SweepPoint>,
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    config: EngineConfig,
    registry: FieldRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Self::with_config(EngineConfig::default())
    }

    /// Vervang de configuratie; ontbrekende velden krijgen hun standaardwaarde.
    #[wasm_bindgen]
    pub fn configure(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config).map_err(to_js_error)?;
        self.config = config;
        Ok(())
    }

    #[wasm_bindgen(js_name = get_config)]
    pub fn config_js(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.config)
    }

    /// Registreer een veld op basis van de teksten voor P en Q.
    #[wasm_bindgen(js_name = register_field)]
    pub fn register_field_js(&mut self, name: &str, p: &str, q: &str) -> Result<JsValue, JsValue> {
        let (final_name, record) = self.register_field(name, p, q).map_err(to_js_error)?;
        to_js_value(&RegisteredField {
            name: &final_name,
            summary: record.summary(),
        })
    }

    #[wasm_bindgen(js_name = list_fields)]
    pub fn list_fields_js(&self) -> Result<JsValue, JsValue> {
        to_js_value(&self.list_fields())
    }

    #[wasm_bindgen(js_name = get_field)]
    pub fn field_js(&self, name: &str) -> Result<JsValue, JsValue> {
        let summary = self.field_summary(name).map_err(to_js_error)?;
        to_js_value(&summary)
    }

    /// Evalueer het veld in een platte lijst `x0, y0, x1, y1, ...`.
    #[wasm_bindgen(js_name = evaluate_field)]
    pub fn evaluate_field_js(&self, name: &str, coordinates: &[f64]) -> Result<Vec<f64>, JsValue> {
        let points = PointArray::from_flat(vec![coordinates.len() / 2], coordinates)
            .map_err(to_js_error)?;
        let values = self
            .evaluate_field_on_grid(name, &points)
            .map_err(to_js_error)?;
        Ok(values.to_flat())
    }

    #[wasm_bindgen(js_name = evaluate_potential)]
    pub fn evaluate_potential_js(&self, name: &str, xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, JsValue> {
        let xs = ScalarArray::from_values(xs.to_vec());
        let ys = ScalarArray::from_values(ys.to_vec());
        let values = self
            .evaluate_potential_on_grid(name, &xs, &ys)
            .map_err(to_js_error)?;
        Ok(values.into_values())
    }

    /// Bereken de arbeid langs een pad (`line`, `parabola`, `canonical-parabola`, `family`).
    #[wasm_bindgen(js_name = compute_work)]
    pub fn compute_work_js(
        &self,
        name: &str,
        kind: &str,
        start: &[f64],
        end: &[f64],
        shape: Option<f64>,
        samples: Option<u32>,
    ) -> Result<f64, JsValue> {
        let kind: PathKind = kind.parse().map_err(to_js_error)?;
        let start = point_from_slice(start).map_err(to_js_error)?;
        let end = point_from_slice(end).map_err(to_js_error)?;
        let samples = self.samples_or_default(samples);
        self.compute_work(name, kind, start, end, shape, samples)
            .map_err(to_js_error)
    }

    /// Sweep over de familieparameter; zonder waarden wordt het weergavebereik gebruikt.
    #[wasm_bindgen(js_name = sweep_family)]
    pub fn sweep_family_js(
        &self,
        name: &str,
        start: &[f64],
        end: &[f64],
        values: Option<Vec<f64>>,
        samples: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let start = point_from_slice(start).map_err(to_js_error)?;
        let end = point_from_slice(end).map_err(to_js_error)?;
        let values = values.unwrap_or_else(|| self.config.sweep.display_values());
        let samples = self.samples_or_default(samples);
        let points = self
            .sweep_family(name, start, end, &values, samples)
            .map_err(to_js_error)?;
        let minimum = work::find_minimum(&points);
        to_js_value(&SweepExport { points, minimum })
    }

    /// Zoek de familieparameter met minimale arbeid over het zoekbereik.
    #[wasm_bindgen(js_name = find_minimum)]
    pub fn find_minimum_js(
        &self,
        name: &str,
        start: &[f64],
        end: &[f64],
        samples: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let start = point_from_slice(start).map_err(to_js_error)?;
        let end = point_from_slice(end).map_err(to_js_error)?;
        let values = self.config.sweep.search_values();
        let samples = self.samples_or_default(samples);
        let minimum = self
            .find_minimum(name, start, end, &values, samples)
            .map_err(to_js_error)?;
        to_js_value(&minimum)
    }

    #[wasm_bindgen(js_name = quiver)]
    pub fn quiver_js(&self, name: &str, start: &[f64], end: &[f64]) -> Result<JsValue, JsValue> {
        let start = point_from_slice(start).map_err(to_js_error)?;
        let end = point_from_slice(end).map_err(to_js_error)?;
        let data = self.quiver(name, start, end).map_err(to_js_error)?;
        to_js_value(&data)
    }

    #[wasm_bindgen(js_name = potential_surface)]
    pub fn potential_surface_js(&self, name: &str) -> Result<JsValue, JsValue> {
        let data = self.potential_surface(name).map_err(to_js_error)?;
        to_js_value(&data)
    }
}

impl Engine {
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let registry = FieldRegistry::with_builtins(&config.potential);
        Self { config, registry }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Parseert, analyseert en registreert een veld onder een vrije naam.
    pub fn register_field(
        &mut self,
        name: &str,
        p_text: &str,
        q_text: &str,
    ) -> Result<(String, &FieldRecord), EngineError> {
        let field = SymbolicField::parse(p_text, q_text)?;
        let final_name = self.registry.unique_name(name, p_text, q_text);
        let record = self
            .registry
            .register(&final_name, field, &self.config.potential)?;
        Ok((final_name, record))
    }

    #[must_use]
    pub fn list_fields(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn field(&self, name: &str) -> Result<&FieldRecord, EngineError> {
        Ok(self.registry.lookup(name)?)
    }

    pub fn field_summary(&self, name: &str) -> Result<FieldSummary, EngineError> {
        Ok(self.field(name)?.summary())
    }

    pub fn evaluate_field_on_grid(
        &self,
        name: &str,
        points: &PointArray,
    ) -> Result<PointArray, EngineError> {
        Ok(self.field(name)?.evaluator().evaluate_array(points))
    }

    /// Faalt met [`FieldError::PotentialUnavailable`] als het veld geen
    /// herwonnen potentiaal heeft.
    pub fn evaluate_potential_on_grid(
        &self,
        name: &str,
        xs: &ScalarArray,
        ys: &ScalarArray,
    ) -> Result<ScalarArray, EngineError> {
        let record = self.field(name)?;
        let potential = record
            .potential()
            .potential()
            .ok_or_else(|| FieldError::PotentialUnavailable(record.name().to_owned()))?;
        Ok(potential.evaluate_grid(xs, ys)?)
    }

    /// Arbeid langs een pad van `start` naar `end`. Zonder `shape` gebruikt de
    /// familie de geconfigureerde standaardwaarde.
    pub fn compute_work(
        &self,
        name: &str,
        kind: PathKind,
        start: Point2,
        end: Point2,
        shape: Option<f64>,
        samples: usize,
    ) -> Result<f64, EngineError> {
        let record = self.field(name)?;
        let path = PathSpec::build(kind, start, end, shape.unwrap_or(self.config.default_shape));
        let work = work::line_integral(
            record.evaluator(),
            &path,
            self.config.integration.interval,
            samples,
        )?;
        log::debug!("arbeid van `{}` langs {kind}: {work}", record.name());
        Ok(work)
    }

    pub fn sweep_family(
        &self,
        name: &str,
        start: Point2,
        end: Point2,
        values: &[f64],
        samples: usize,
    ) -> Result<Vec<SweepPoint>, EngineError> {
        let record = self.field(name)?;
        Ok(work::sweep_family(
            record.evaluator(),
            start,
            end,
            values,
            self.config.integration.interval,
            samples,
        )?)
    }

    pub fn find_minimum(
        &self,
        name: &str,
        start: Point2,
        end: Point2,
        values: &[f64],
        samples: usize,
    ) -> Result<Option<SweepPoint>, EngineError> {
        let points = self.sweep_family(name, start, end, values, samples)?;
        Ok(work::find_minimum(&points))
    }

    /// Pijlenveld rond de rechte lijn en de familiecurve van `start` naar `end`.
    pub fn quiver(&self, name: &str, start: Point2, end: Point2) -> Result<QuiverData, EngineError> {
        let record = self.field(name)?;
        let settings = self.config.quiver;
        let t = grid::linspace(
            self.config.integration.interval.start,
            self.config.integration.interval.end,
            settings.density.max(2),
        );
        let line = PathSpec::build(PathKind::Line, start, end, 0.0).positions(&t);
        let curve =
            PathSpec::build(PathKind::Family, start, end, self.config.default_shape).positions(&t);
        let window = PlotWindow::around([line.as_slice(), curve.as_slice()])
            .unwrap_or(settings.window);

        let (xs, ys) = window.sample(settings.density);
        let points = stack_points(&xs, &ys)?;
        let values = record.evaluator().evaluate_points(points.points());
        Ok(QuiverData {
            shape: points.shape().to_vec(),
            x: xs.into_values(),
            y: ys.into_values(),
            u: values.iter().map(|value| value[0]).collect(),
            v: values.iter().map(|value| value[1]).collect(),
        })
    }

    /// Potentiaaloppervlak over het geconfigureerde venster.
    pub fn potential_surface(&self, name: &str) -> Result<SurfaceData, EngineError> {
        let (xs, ys) = self.config.surface.sample();
        let z = self.evaluate_potential_on_grid(name, &xs, &ys)?;
        Ok(SurfaceData {
            shape: z.shape().to_vec(),
            x: xs.into_values(),
            y: ys.into_values(),
            z: z.into_values(),
        })
    }

    fn samples_or_default(&self, samples: Option<u32>) -> usize {
        samples.map_or(self.config.integration.samples, |count| count as usize)
    }
}

fn point_from_slice(values: &[f64]) -> Result<Point2, EngineError> {
    match values {
        [x, y] => Ok([*x, *y]),
        other => Err(EngineError::PointArity(other.len())),
    }
}

fn to_js_value<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
