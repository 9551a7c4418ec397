// Errors surfaced by the vegetation use case
use thiserror::Error;

pub const NO_DATA_MESSAGE: &str =
    "No se encontraron datos de NDVI para la ubicación y fechas especificadas.";

#[derive(Error, Debug)]
pub enum VegetationError {
    #[error("{message}")]
    Validation { message: String },

    #[error("{}", NO_DATA_MESSAGE)]
    NoData,

    #[error("Ocurrió un error al procesar la solicitud en Google Earth Engine: {message}")]
    Upstream { message: String },
}

impl From<anyhow::Error> for VegetationError {
    fn from(err: anyhow::Error) -> Self {
        // alternate formatting keeps the context chain in one line
        Self::Upstream {
            message: format!("{:#}", err),
        }
    }
}

impl VegetationError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
