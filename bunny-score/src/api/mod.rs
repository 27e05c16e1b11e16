//! HTTP API handlers for bunny-score

pub mod health;
pub mod registries;
pub mod score;

pub use health::health_routes;
pub use registries::registry_routes;
pub use score::score_routes;
