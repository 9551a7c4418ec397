// Earth Engine repository implementation
use crate::application::imagery_repository::ImageryRepository;
use crate::domain::location::{DateRange, Location};
use crate::domain::vegetation::ReducedFeature;
use crate::infrastructure::config::{AppConfig, DatasetSettings};
use crate::infrastructure::credentials::CredentialSource;
use crate::infrastructure::earth_engine_error::EarthEngineError;
use crate::infrastructure::ee_expression::{point_time_series, Expression};
use crate::infrastructure::token_provider::TokenProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct EarthEngineRepository {
    http: reqwest::Client,
    base_url: String,
    project: String,
    dataset: DatasetSettings,
    tokens: TokenProvider,
}

#[derive(Debug, Serialize)]
struct ComputeRequest<'a> {
    expression: &'a Expression,
}

#[derive(Debug, Deserialize)]
struct ComputeResponse {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl EarthEngineRepository {
    pub fn new(
        http: reqwest::Client,
        base_url: String,
        project: String,
        dataset: DatasetSettings,
        tokens: TokenProvider,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            project,
            dataset,
            tokens,
        }
    }

    /// Load credentials and obtain a first access token. Any failure here is fatal for the service.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let source = CredentialSource::resolve(&config.credentials);
        tracing::info!("Loading service account credentials from {}", source.describe());

        let key = source.load()?;
        if let Some(project) = key.project_id.as_deref().filter(|p| *p != config.earth_engine.project) {
            tracing::info!(
                "Service account belongs to project {}, sending requests to project {}",
                project,
                config.earth_engine.project
            );
        }
        let http = reqwest::Client::new();
        let tokens = TokenProvider::new(http.clone(), key, config.earth_engine.scope.clone())?;

        tokens
            .access_token()
            .await
            .with_context(|| format!("Failed to authenticate {}", tokens.client_email()))?;

        Ok(Self::new(
            http,
            config.earth_engine.base_url.clone(),
            config.earth_engine.project.clone(),
            config.dataset.clone(),
            tokens,
        ))
    }

    fn compute_url(&self) -> String {
        format!("{}/v1/projects/{}/value:compute", self.base_url, self.project)
    }

    async fn compute(&self, expression: &Expression) -> Result<Value, EarthEngineError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(self.compute_url())
            .bearer_auth(token)
            .json(&ComputeRequest { expression })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            tracing::warn!("Earth Engine compute returned {}: {}", status, message);
            return Err(EarthEngineError::Api { message });
        }

        let data = response.json::<ComputeResponse>().await?;
        Ok(data.result)
    }
}

/// Pull `(date, mean)` out of every feature of a computed FeatureCollection
fn parse_features(result: &Value) -> Result<Vec<ReducedFeature>, EarthEngineError> {
    let features = result
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| EarthEngineError::MalformedResponse("missing 'features' array".to_string()))?;

    features
        .iter()
        .map(|feature| {
            let properties = feature.get("properties");
            let date = properties
                .and_then(|p| p.get("date"))
                .and_then(Value::as_str)
                .ok_or_else(|| EarthEngineError::MalformedResponse("feature without 'date'".to_string()))?;
            let mean = match properties.and_then(|p| p.get("mean")) {
                None | Some(Value::Null) => None,
                Some(value) => Some(value.as_f64().ok_or_else(|| {
                    EarthEngineError::MalformedResponse(format!("non-numeric 'mean' for {}: {}", date, value))
                })?),
            };
            Ok(ReducedFeature::new(date.to_string(), mean))
        })
        .collect()
}

#[async_trait]
impl ImageryRepository for EarthEngineRepository {
    async fn reduce_time_series(&self, location: &Location, range: &DateRange) -> Result<Vec<ReducedFeature>> {
        let expression = point_time_series(&self.dataset, location, range);
        tracing::debug!(
            "Computing {} {} at ({}, {}) for {}..{}",
            self.dataset.collection,
            self.dataset.band,
            location.lat,
            location.lon,
            range.inicio,
            range.fin
        );

        let result = self.compute(&expression).await?;
        Ok(parse_features(&result)?)
    }
}
