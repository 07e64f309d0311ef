pub mod config;
pub mod metadata;
pub mod properties;
pub mod resolver;
pub mod routes;
pub mod services;
