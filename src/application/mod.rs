// Application layer - Use cases and the port to the imagery platform
pub mod imagery_repository;
pub mod vegetation_service;
