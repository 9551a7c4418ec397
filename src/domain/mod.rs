// Domain layer - Request and response shapes for vegetation time series
pub mod error;
pub mod location;
pub mod vegetation;
