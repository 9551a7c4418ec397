use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub earth_engine: EarthEngineSettings,
    pub dataset: DatasetSettings,
    pub credentials: CredentialSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EarthEngineSettings {
    pub base_url: String,
    pub project: String,
    pub scope: String,
}

/// Image product the time series is drawn from.
/// `scale_factor` and `decimals` follow the product's raw integer encoding.
#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    pub collection: String,
    pub band: String,
    pub scale_meters: f64,
    pub scale_factor: f64,
    pub decimals: u32,
    pub date_format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialSettings {
    /// Variable holding the service-account JSON itself
    pub json_env: String,
    /// Variable holding a path to the service-account JSON file
    pub path_env: String,
    pub default_path: String,
}

fn settings_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.bind_addr", "0.0.0.0:8080")?
        .set_default("earth_engine.base_url", "https://earthengine-highvolume.googleapis.com")?
        .set_default("earth_engine.project", "api-vegetacion-datos")?
        .set_default("earth_engine.scope", "https://www.googleapis.com/auth/earthengine")?
        .set_default("dataset.collection", "MODIS/061/MOD13Q1")?
        .set_default("dataset.band", "NDVI")?
        .set_default("dataset.scale_meters", 250.0)?
        .set_default("dataset.scale_factor", 0.0001)?
        .set_default("dataset.decimals", 4_i64)?
        .set_default("dataset.date_format", "YYYY-MM-dd")?
        .set_default("credentials.json_env", "GOOGLE_APPLICATION_CREDENTIALS_JSON")?
        .set_default("credentials.path_env", "GOOGLE_APPLICATION_CREDENTIALS")?
        .set_default("credentials.default_path", "/app/credentials.json")
}

/// Defaults, then `config/app.*` if present, then `VEGETACION__SECTION__KEY` variables
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = settings_builder()?
        .add_source(config::File::with_name("config/app").required(false))
        .add_source(
            config::Environment::with_prefix("VEGETACION")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
