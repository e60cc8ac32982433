//! Wiring shared by the interactive panel and the one-shot commands.

use panel_core::api::ReqwestTransport;
use panel_core::panel::install_endpoints;
use panel_core::{ApiDispatcher, PanelConfig, PanelState, SharedPanel};
use std::sync::Arc;
use tracing::info;

/// A dispatcher with every panel endpoint installed, plus the panel it feeds.
pub struct Session {
    pub dispatcher: ApiDispatcher,
    pub panel: SharedPanel,
}

impl Session {
    pub async fn open(config: &PanelConfig) -> anyhow::Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(
            config.base_url.clone(),
            config.request_timeout,
        )?);
        let dispatcher = ApiDispatcher::new(transport);
        let panel = PanelState::shared(config.log_capacity);
        install_endpoints(&dispatcher, &panel, config).await?;
        info!("🌐 Connected panel to {}", config.base_url);
        Ok(Self { dispatcher, panel })
    }
}
