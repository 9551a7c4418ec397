// Location and date range domain models
use crate::domain::error::VegetationError;
use chrono::NaiveDate;
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    /// Build a location, rejecting coordinates outside the WGS84 bounds
    pub fn new(lat: f64, lon: f64) -> Result<Self, VegetationError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(VegetationError::validation(format!(
                "lat debe estar entre -90 y 90 (recibido {})",
                lat
            )));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(VegetationError::validation(format!(
                "lon debe estar entre -180 y 180 (recibido {})",
                lon
            )));
        }
        Ok(Self { lat, lon })
    }
}

/// Inclusive start, exclusive end; ordering is left to the upstream filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub inicio: String,
    pub fin: String,
}

impl DateRange {
    pub fn new(inicio: String, fin: String) -> Result<Self, VegetationError> {
        Self::check_date("fecha_inicio", &inicio)?;
        Self::check_date("fecha_fin", &fin)?;
        Ok(Self { inicio, fin })
    }

    fn check_date(field: &str, value: &str) -> Result<(), VegetationError> {
        // chrono accepts unpadded fields, the API contract does not
        if value.len() != 10 || NaiveDate::parse_from_str(value, DATE_FORMAT).is_err() {
            return Err(VegetationError::validation(format!(
                "{} debe tener el formato AAAA-MM-DD (recibido '{}')",
                field, value
            )));
        }
        Ok(())
    }
}
