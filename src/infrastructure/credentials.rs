// Service-account credential resolution
use crate::infrastructure::config::CredentialSettings;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Failed to read credentials file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid service account JSON from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid service account private key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}

/// Where the service-account key comes from
#[derive(Clone, PartialEq)]
pub enum CredentialSource {
    /// The key JSON itself, taken from an environment variable
    EnvJson { var: String, json: String },
    /// A path to the key file
    File(PathBuf),
}

impl CredentialSource {
    /// The JSON variable wins when set; otherwise the path variable, then the default path
    pub fn resolve(settings: &CredentialSettings) -> Self {
        Self::resolve_with(settings, |name| std::env::var(name).ok())
    }

    fn resolve_with<F>(settings: &CredentialSettings, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(json) = lookup(&settings.json_env).filter(|v| !v.trim().is_empty()) {
            return Self::EnvJson {
                var: settings.json_env.clone(),
                json,
            };
        }

        let path = lookup(&settings.path_env).unwrap_or_else(|| settings.default_path.clone());
        Self::File(PathBuf::from(path))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::EnvJson { var, .. } => format!("environment variable {}", var),
            Self::File(path) => format!("file {}", path.display()),
        }
    }

    pub fn load(&self) -> Result<ServiceAccountKey, CredentialError> {
        let json = match self {
            Self::EnvJson { json, .. } => json.clone(),
            Self::File(path) => std::fs::read_to_string(path).map_err(|source| CredentialError::Read {
                path: path.clone(),
                source,
            })?,
        };

        serde_json::from_str(&json).map_err(|source| CredentialError::Parse {
            origin: self.describe(),
            source,
        })
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub project_id: Option<String>,
}

// keep the private key out of logs
impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}
