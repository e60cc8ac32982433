//! Per-action handlers binding the dispatcher to the panel view model.

use super::{Action, ButtonState, Field, FieldState, FullStatus, SharedPanel};
use crate::api::{ApiDispatcher, ApiResponse, CallContext, RequestHandler};
use crate::config::PanelConfig;
use crate::error::PanelError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Action with default hooks only.
pub struct PlainAction;

#[async_trait]
impl RequestHandler for PlainAction {}

/// `server/say`: sends the chat message field once it passed validation.
pub struct ServerSay {
    panel: SharedPanel,
}

#[async_trait]
impl RequestHandler for ServerSay {
    async fn data(&self) -> Option<String> {
        Some(self.panel.read().await.message.value.clone())
    }

    async fn on_precall(&self, ctx: &CallContext) -> bool {
        ctx.lifecycle().is_ready() && self.panel.read().await.message.state == FieldState::Success
    }

    async fn on_success(&self, _ctx: &CallContext, _response: &ApiResponse) {
        let mut panel = self.panel.write().await;
        panel.message.reset();
        panel.send_button = ButtonState::Brand;
    }
}

/// `server/motd` and `server/password`: submit a field, clear it on success.
pub struct FieldSubmit {
    panel: SharedPanel,
    field: Field,
}

#[async_trait]
impl RequestHandler for FieldSubmit {
    async fn data(&self) -> Option<String> {
        let panel = self.panel.read().await;
        let value = &panel.field(self.field).value;
        (!value.is_empty()).then(|| value.clone())
    }

    async fn on_success(&self, _ctx: &CallContext, _response: &ApiResponse) {
        self.panel.write().await.field_mut(self.field).reset();
    }
}

/// `server/restart`: refuses a second restart while one is in flight.
pub struct ServerRestart {
    panel: SharedPanel,
}

#[async_trait]
impl RequestHandler for ServerRestart {
    async fn on_precall(&self, ctx: &CallContext) -> bool {
        if !ctx.lifecycle().is_ready() {
            return false;
        }
        let mut panel = self.panel.write().await;
        if panel.restart_busy {
            info!("Server is currently restarting");
            return false;
        }
        panel.restart_busy = true;
        true
    }

    async fn on_complete(&self, _ctx: &CallContext, _response: &ApiResponse) {
        self.panel.write().await.restart_busy = false;
    }
}

/// `ajax/fullstatus`: refreshes the status block and player list.
pub struct FullStatusRefresh {
    panel: SharedPanel,
}

#[async_trait]
impl RequestHandler for FullStatusRefresh {
    async fn on_success(&self, ctx: &CallContext, response: &ApiResponse) {
        match FullStatus::from_json(&response.body) {
            Ok(status) => {
                debug!(
                    "Full status: {} players, online={}",
                    status.player_count, status.online
                );
                self.panel.write().await.status.apply(status);
            }
            Err(e) => warn!(
                "Undecodable full status from {}: {}",
                ctx.request(),
                PanelError::from(e)
            ),
        }
    }
}

/// `player/kick`: refreshes the player list shortly after the kick lands.
pub struct PlayerKick {
    refresh_delay: Duration,
}

#[async_trait]
impl RequestHandler for PlayerKick {
    async fn on_complete(&self, ctx: &CallContext, _response: &ApiResponse) {
        let dispatcher = ctx.dispatcher().clone();
        let delay = self.refresh_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = dispatcher.call_action(Action::FullStatus, None).await {
                warn!("Status refresh after kick failed: {}", e);
            }
        });
    }
}

/// Registers every panel endpoint, then marks the panel ready.
///
/// Calls made before this returns are refused by the pre-call gates.
pub async fn install_endpoints(
    dispatcher: &ApiDispatcher,
    panel: &SharedPanel,
    config: &PanelConfig,
) -> Result<(), PanelError> {
    for action in Action::ALL {
        let handler: Arc<dyn RequestHandler> = match action {
            Action::FullStatus => Arc::new(FullStatusRefresh {
                panel: panel.clone(),
            }),
            Action::Kick => Arc::new(PlayerKick {
                refresh_delay: config.kick_refresh_delay,
            }),
            Action::Say => Arc::new(ServerSay {
                panel: panel.clone(),
            }),
            Action::Motd => Arc::new(FieldSubmit {
                panel: panel.clone(),
                field: Field::Motd,
            }),
            Action::Password => Arc::new(FieldSubmit {
                panel: panel.clone(),
                field: Field::Password,
            }),
            Action::Restart => Arc::new(ServerRestart {
                panel: panel.clone(),
            }),
            Action::Ban
            | Action::Stop
            | Action::Time
            | Action::Start
            | Action::Status
            | Action::Settle => Arc::new(PlainAction),
        };
        dispatcher
            .register(action.scope(), action.object(), handler)
            .await?;
    }

    dispatcher.lifecycle().mark_ready();
    info!("Panel ready with {} endpoints", Action::ALL.len());
    Ok(())
}

/// Starts the background full-status poll.
pub fn start_polling(dispatcher: &ApiDispatcher, config: &PanelConfig) -> JoinHandle<()> {
    dispatcher.spawn_poll(
        Action::FullStatus.scope(),
        Action::FullStatus.object(),
        config.poll_interval,
    )
}
