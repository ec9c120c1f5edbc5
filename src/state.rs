//! Shared state handed to every Axum handler.

use std::sync::Arc;

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;
use crate::storage::ImageStorage;

/// Cloning is cheap: the pool, services and storage are all reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Used directly only by the health checks
    pub db_pool: AsyncDbPool,
    /// Read by the bearer-token middleware
    pub jwt_config: JwtConfig,
    pub storage: Arc<dyn ImageStorage>,
}

impl AppState {
    /// Wires repositories and services onto `pool`.
    pub fn new(pool: AsyncDbPool, jwt_config: JwtConfig, storage: Arc<dyn ImageStorage>) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, storage.clone(), jwt_config.clone());
        Self {
            services,
            db_pool: pool,
            jwt_config,
            storage,
        }
    }
}
