// HTTP request handlers
use crate::domain::error::VegetationError;
use crate::domain::location::{DateRange, Location};
use crate::domain::vegetation::TimeSeries;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct VegetationQuery {
    pub lat: f64,
    pub lon: f64,
    pub fecha_inicio: String,
    pub fecha_fin: String,
}

/// Welcome message
pub async fn root() -> Json<Value> {
    Json(json!({
        "mensaje": "Bienvenido a la API de Patrones de Vegetación. Usa el endpoint /api/v1/patrones_vegetacion?lat=&lon=&fecha_inicio=&fecha_fin= para consultar la serie temporal de NDVI."
    }))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// NDVI time series for a point and date range
pub async fn get_vegetation_patterns(
    State(state): State<Arc<AppState>>,
    query: Result<Query<VegetationQuery>, QueryRejection>,
) -> Result<Json<TimeSeries>, VegetationError> {
    let Query(query) = query.map_err(|rejection| VegetationError::validation(rejection.body_text()))?;

    let location = Location::new(query.lat, query.lon)?;
    let range = DateRange::new(query.fecha_inicio, query.fecha_fin)?;

    let series = state.vegetation_service.get_time_series(location, range).await?;
    tracing::info!(
        "Returning {} NDVI samples for ({}, {})",
        series.serie_temporal_ndvi.len(),
        series.ubicacion.lat,
        series.ubicacion.lon
    );

    Ok(Json(series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::vegetation_service::tests::StubRepository;
    use crate::application::vegetation_service::VegetationService;
    use crate::domain::error::NO_DATA_MESSAGE;
    use crate::domain::vegetation::{ReducedFeature, Rescaler};
    use crate::presentation::routes::build_router;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use tower::ServiceExt;

    fn app(repo: Arc<StubRepository>) -> Router {
        build_router(Arc::new(AppState {
            vegetation_service: VegetationService::new(repo, Rescaler::new(0.0001, 4)),
        }))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    const LIMA_JANUARY: &str =
        "/api/v1/patrones_vegetacion?lat=-12.046374&lon=-77.042793&fecha_inicio=2022-01-01&fecha_fin=2022-01-31";

    #[tokio::test]
    async fn test_single_sample_response() {
        let repo = StubRepository::returning(vec![ReducedFeature::new("2022-01-17".to_string(), Some(7500.0))]);
        let (status, body) = get(app(repo), LIMA_JANUARY).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "ubicacion": {"lat": -12.046374, "lon": -77.042793},
                "rango_fechas": {"inicio": "2022-01-01", "fin": "2022-01-31"},
                "serie_temporal_ndvi": [{"fecha": "2022-01-17", "ndvi": 0.75}]
            })
        );
    }

    #[tokio::test]
    async fn test_missing_values_are_omitted() {
        let repo = StubRepository::returning(vec![
            ReducedFeature::new("2022-01-01".to_string(), Some(3187.0)),
            ReducedFeature::new("2022-01-17".to_string(), None),
            ReducedFeature::new("2022-02-02".to_string(), Some(-150.0)),
        ]);
        let (status, body) = get(app(repo), LIMA_JANUARY).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["serie_temporal_ndvi"],
            json!([
                {"fecha": "2022-01-01", "ndvi": 0.3187},
                {"fecha": "2022-02-02", "ndvi": -0.015}
            ])
        );
    }

    #[tokio::test]
    async fn test_no_features_is_not_found() {
        let repo = StubRepository::returning(vec![]);
        let (status, body) = get(app(repo), LIMA_JANUARY).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], NO_DATA_MESSAGE);
    }

    #[tokio::test]
    async fn test_out_of_bounds_never_calls_upstream() {
        let repo = StubRepository::returning(vec![]);
        for uri in [
            "/api/v1/patrones_vegetacion?lat=91&lon=0&fecha_inicio=2022-01-01&fecha_fin=2022-01-31",
            "/api/v1/patrones_vegetacion?lat=-90.5&lon=0&fecha_inicio=2022-01-01&fecha_fin=2022-01-31",
            "/api/v1/patrones_vegetacion?lat=0&lon=180.01&fecha_inicio=2022-01-01&fecha_fin=2022-01-31",
            "/api/v1/patrones_vegetacion?lat=0&lon=-181&fecha_inicio=2022-01-01&fecha_fin=2022-01-31",
        ] {
            let (status, body) = get(app(repo.clone()), uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
            assert!(body["detail"].is_string());
        }
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_parameters_are_unprocessable() {
        let repo = StubRepository::returning(vec![]);
        for uri in [
            "/api/v1/patrones_vegetacion?lat=abc&lon=0&fecha_inicio=2022-01-01&fecha_fin=2022-01-31",
            "/api/v1/patrones_vegetacion?lat=0&lon=0&fecha_inicio=2022-01-01",
            "/api/v1/patrones_vegetacion?lat=0&lon=0&fecha_inicio=2022/01/01&fecha_fin=2022-01-31",
        ] {
            let (status, _) = get(app(repo.clone()), uri).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        }
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_server_error() {
        let repo = StubRepository::failing("Earth Engine memory capacity exceeded.");
        let (status, body) = get(app(repo), LIMA_JANUARY).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["detail"],
            "Ocurrió un error al procesar la solicitud en Google Earth Engine: Earth Engine memory capacity exceeded."
        );
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let (status, body) = get(app(StubRepository::returning(vec![])), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["mensaje"]
            .as_str()
            .unwrap()
            .starts_with("Bienvenido a la API de Patrones de Vegetación. "));

        let response = app(StubRepository::returning(vec![]))
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
