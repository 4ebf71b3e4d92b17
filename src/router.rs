//! Assembles the HTTP application.

use std::sync::Arc;

use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::instance::create_instance_router;
use crate::schema::create_schema_router;
use crate::{DataStore, InMemoryDataStore, ValidationLimits};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Backing store.
    pub store: Arc<dyn DataStore>,
    /// Bounds applied to schema structure validation.
    pub limits: ValidationLimits,
}

impl AppState {
    /// State over `store` with default validation limits.
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            limits: ValidationLimits::default(),
        }
    }

    /// State over a fresh [`InMemoryDataStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryDataStore::new()))
    }

    /// Replaces the validation limits.
    pub fn with_limits(mut self, limits: ValidationLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Body of responses that only carry a message, such as successful deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// The message.
    pub message: String,
}

impl MessageResponse {
    /// Wraps a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Builds the full application: schema and instance routes under `/api`, request tracing, and
/// permissive CORS.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(create_schema_router(state.clone()))
        .merge(create_instance_router(state));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
