// Application state for HTTP handlers
use crate::application::vegetation_service::VegetationService;

#[derive(Clone)]
pub struct AppState {
    pub vegetation_service: VegetationService,
}
