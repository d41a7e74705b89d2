use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use errmap_core::{wrap, ErrorMapper, ResolverPolicy};

use crate::products::{bootstrap, ProductService};

/// Default deadline for a single store operation.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Startup configuration for the server.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub policy: ResolverPolicy,
    pub op_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            policy: ResolverPolicy::default(),
            op_timeout: DEFAULT_OP_TIMEOUT,
        }
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
    pub mapper: Arc<ErrorMapper>,
    pub op_timeout: Duration,
}

impl AppState {
    /// Register sentinels, build the catalog, and wire the product service.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        let (errors, catalog) = bootstrap()?;
        Ok(Self::from_parts(
            ProductService::new(errors),
            ErrorMapper::new(catalog, config.policy),
            config.op_timeout,
        ))
    }

    pub fn from_parts(products: ProductService, mapper: ErrorMapper, op_timeout: Duration) -> Self {
        Self {
            products: Arc::new(products),
            mapper: Arc::new(mapper),
            op_timeout,
        }
    }

    /// Run a store operation under the configured deadline.
    pub async fn with_deadline<T, F>(&self, operation: &str, fut: F) -> anyhow::Result<T>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(result) => result,
            Err(elapsed) => Err(wrap(operation, elapsed)),
        }
    }
}
