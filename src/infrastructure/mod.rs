// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod credentials;
pub mod earth_engine_error;
pub mod earth_engine_repository;
pub mod ee_expression;
pub mod http_response;
pub mod token_provider;
