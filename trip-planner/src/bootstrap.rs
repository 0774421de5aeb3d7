//! Startup wait for the core provider resource.

use tracing::{error, info};

use crate::config::BootstrapConfig;
use crate::error::PlanError;
use crate::provider::ScriptLoader;

/// Waits for the core map resource to become available.
///
/// Returns immediately if it is already present. Otherwise starts the
/// fetch and waits up to the configured bound. Expiry, or a fetch that
/// fails outright, is reported once as
/// [`PlanError::ResourceLoadTimeout`] and is not retried.
pub async fn await_core(loader: &dyn ScriptLoader, config: &BootstrapConfig) -> Result<(), PlanError> {
    if loader.is_present() {
        return Ok(());
    }

    let after = config.timeout();
    match tokio::time::timeout(after, loader.load()).await {
        Ok(Ok(())) => {
            info!("core map resource loaded");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(error = %e, "core map resource failed to load");
            Err(PlanError::ResourceLoadTimeout { after })
        }
        Err(_) => {
            error!(?after, "core map resource did not load in time");
            Err(PlanError::ResourceLoadTimeout { after })
        }
    }
}
