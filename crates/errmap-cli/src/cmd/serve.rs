use std::time::Duration;

use anyhow::Result;
use errmap_core::ResolverPolicy;
use errmap_server::ServerConfig;

pub fn run(port: u16, policy: ResolverPolicy, op_timeout_ms: u64) -> Result<()> {
    let config = ServerConfig {
        policy,
        op_timeout: Duration::from_millis(op_timeout_ms),
    };
    if !policy.hide_details {
        tracing::warn!("error details are exposed to clients");
    }

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(errmap_server::serve(config, port))
}
