pub mod config;
pub mod maintenance;
pub mod observability;
pub mod rest;
pub mod retry;
pub mod vehicle;

use std::sync::Arc;
use std::time::Duration;

use config::ServiceConfig;
use retry::RetryPolicy;
use vehicle::{VehicleDataService, VinProvider, VpicProvider};

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServiceConfig>,
    /// VIN decode proxy (validation + memo table + retry).
    pub vehicle_data: Arc<VehicleDataService>,
    pub started_at: std::time::Instant,
}

impl AppContext {
    /// Wire the production context: vPIC-backed vehicle data per config.
    pub fn new(config: ServiceConfig) -> anyhow::Result<Self> {
        let provider = VpicProvider::new(
            config.vehicle_data.base_url.clone(),
            Duration::from_secs(config.vehicle_data.timeout_secs),
        )?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Build a context around an arbitrary [`VinProvider`] — the seam tests
    /// use to avoid the network.
    pub fn with_provider(config: ServiceConfig, provider: Arc<dyn VinProvider>) -> Self {
        let vehicle_data = Arc::new(VehicleDataService::new(
            provider,
            config.vehicle_data.cache_capacity,
            Duration::from_secs(config.vehicle_data.cache_ttl_secs),
            RetryPolicy::new(
                config.retry.max_attempts,
                config.retry.initial_delay_ms,
                config.retry.max_delay_ms,
            ),
        ));
        Self {
            config: Arc::new(config),
            vehicle_data,
            started_at: std::time::Instant::now(),
        }
    }
}
