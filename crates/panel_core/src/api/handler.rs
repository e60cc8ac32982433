//! Request handler hooks and the panel lifecycle flag.

use super::dispatcher::CallContext;
use super::transport::ApiResponse;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Ready flag for a panel session.
///
/// Requests are refused by the default [`RequestHandler::on_precall`] until
/// the endpoints are installed and the flag is raised.
#[derive(Debug, Default)]
pub struct Lifecycle {
    ready: AtomicBool,
}

impl Lifecycle {
    /// Creates a lifecycle in the not-ready state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the panel finished installing its endpoints.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Marks the panel ready. Later calls are no-ops.
    pub fn mark_ready(&self) {
        if !self.ready.swap(true, Ordering::AcqRel) {
            info!("🟢 Panel ready, requests unblocked");
        }
    }
}

/// Hooks fired around one remote action.
///
/// Every hook has a default, so an action only overrides the points it
/// cares about. The default response hooks emit a debug diagnostic and do
/// nothing else.
///
/// # Call order
///
/// 1. [`data`](Self::data) supplies the static path segment
/// 2. [`on_precall`](Self::on_precall) decides whether the request is sent
/// 3. [`on_complete`](Self::on_complete) fires for every response
/// 4. exactly one of the status-class hooks fires, when the status is in 200-599
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Path segment placed before the call-time argument.
    async fn data(&self) -> Option<String> {
        None
    }

    /// Gate evaluated after the request URL is built. `false` drops the call.
    async fn on_precall(&self, ctx: &CallContext) -> bool {
        ctx.lifecycle().is_ready()
    }

    /// Fires for every response, before the status-class hook.
    async fn on_complete(&self, ctx: &CallContext, _response: &ApiResponse) {
        unimplemented_hook("on_complete", ctx);
    }

    /// 2xx responses.
    async fn on_success(&self, ctx: &CallContext, _response: &ApiResponse) {
        unimplemented_hook("on_success", ctx);
    }

    /// 3xx responses.
    async fn on_redirect(&self, ctx: &CallContext, _response: &ApiResponse) {
        unimplemented_hook("on_redirect", ctx);
    }

    /// 4xx responses.
    async fn on_client_error(&self, ctx: &CallContext, _response: &ApiResponse) {
        unimplemented_hook("on_client_error", ctx);
    }

    /// 5xx responses.
    async fn on_server_error(&self, ctx: &CallContext, _response: &ApiResponse) {
        unimplemented_hook("on_server_error", ctx);
    }
}

fn unimplemented_hook(hook: &str, ctx: &CallContext) {
    debug!("Unimplemented hook {}: {}", hook, ctx.request());
}
