// Vegetation time series domain models
use crate::domain::location::{DateRange, Location};
use serde::Serialize;

/// One row of the reduced collection as returned by the imagery platform
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedFeature {
    pub date: String,
    pub mean: Option<f64>,
}

impl ReducedFeature {
    pub fn new(date: String, mean: Option<f64>) -> Self {
        Self { date, mean }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VegetationSample {
    pub fecha: String,
    pub ndvi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub ubicacion: Location,
    pub rango_fechas: DateRange,
    pub serie_temporal_ndvi: Vec<VegetationSample>,
}

/// Converts raw integer-encoded band values into physical index values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescaler {
    pub scale_factor: f64,
    pub decimals: u32,
}

impl Rescaler {
    pub fn new(scale_factor: f64, decimals: u32) -> Self {
        Self {
            scale_factor,
            decimals,
        }
    }

    /// Round the scaled value to `decimals` places from its exact binary value, ties to even
    pub fn apply(&self, raw: f64) -> f64 {
        let scaled = raw * self.scale_factor;
        format!("{:.*}", self.decimals as usize, scaled)
            .parse()
            .unwrap_or(scaled)
    }

    /// Drop features without a value and rescale the rest, keeping upstream order
    pub fn shape(&self, features: Vec<ReducedFeature>) -> Vec<VegetationSample> {
        features
            .into_iter()
            .filter_map(|f| {
                f.mean.map(|raw| VegetationSample {
                    fecha: f.date,
                    ndvi: self.apply(raw),
                })
            })
            .collect()
    }
}
