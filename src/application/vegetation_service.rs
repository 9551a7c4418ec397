// Vegetation service - Use case for building an NDVI time series
use crate::application::imagery_repository::ImageryRepository;
use crate::domain::error::VegetationError;
use crate::domain::location::{DateRange, Location};
use crate::domain::vegetation::{Rescaler, TimeSeries};
use std::sync::Arc;

#[derive(Clone)]
pub struct VegetationService {
    repository: Arc<dyn ImageryRepository>,
    rescaler: Rescaler,
}

impl VegetationService {
    pub fn new(repository: Arc<dyn ImageryRepository>, rescaler: Rescaler) -> Self {
        Self {
            repository,
            rescaler,
        }
    }

    pub async fn get_time_series(
        &self,
        location: Location,
        range: DateRange,
    ) -> Result<TimeSeries, VegetationError> {
        let features = self.repository.reduce_time_series(&location, &range).await?;
        let total = features.len();

        let samples = self.rescaler.shape(features);
        tracing::debug!(
            "Kept {} of {} reduced images for ({}, {})",
            samples.len(),
            total,
            location.lat,
            location.lon
        );

        if samples.is_empty() {
            return Err(VegetationError::NoData);
        }

        Ok(TimeSeries {
            ubicacion: location,
            rango_fechas: range,
            serie_temporal_ndvi: samples,
        })
    }
}
