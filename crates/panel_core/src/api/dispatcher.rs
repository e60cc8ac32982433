//! Request dispatch and completion routing.

use super::handler::{Lifecycle, RequestHandler};
use super::registry::{EndpointRegistry, Exchange};
use super::transport::{ApiResponse, HttpTransport};
use super::{build_request, StatusClass, SCOPES};
use crate::error::PanelError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// What happened to a call once its hooks ran.
#[derive(Debug)]
pub enum CallOutcome {
    /// The pre-call gate refused the request; nothing was sent
    Blocked,
    /// The request is in flight on the returned task
    Dispatched(JoinHandle<()>),
}

impl CallOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, CallOutcome::Blocked)
    }

    /// Waits for a dispatched request to finish running its hooks.
    ///
    /// Returns `false` when the call was blocked.
    pub async fn finished(self) -> bool {
        match self {
            CallOutcome::Blocked => false,
            CallOutcome::Dispatched(handle) => {
                if let Err(e) = handle.await {
                    error!("Request task failed: {}", e);
                }
                true
            }
        }
    }
}

/// Context handed to every hook.
///
/// Carries the request URL being processed and a dispatcher handle so a
/// hook can issue follow-up calls.
#[derive(Clone)]
pub struct CallContext {
    dispatcher: ApiDispatcher,
    request: String,
}

impl CallContext {
    /// URL of the request this hook is running for.
    pub fn request(&self) -> &str {
        &self.request
    }

    pub fn dispatcher(&self) -> &ApiDispatcher {
        &self.dispatcher
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.dispatcher.lifecycle
    }
}

/// Central hub for remote actions.
///
/// Cloning is cheap: all clones share the registry, transport and lifecycle.
#[derive(Clone)]
pub struct ApiDispatcher {
    registry: Arc<RwLock<EndpointRegistry>>,
    transport: Arc<dyn HttpTransport>,
    lifecycle: Arc<Lifecycle>,
}

impl std::fmt::Debug for ApiDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiDispatcher")
            .field("registry", &"[registry]")
            .field("transport", &"[transport]")
            .field("ready", &self.lifecycle.is_ready())
            .finish()
    }
}

impl ApiDispatcher {
    /// Creates a dispatcher with the panel scopes and an empty registry.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_registry(EndpointRegistry::with_scopes(SCOPES), transport)
    }

    pub fn with_registry(registry: EndpointRegistry, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            transport,
            lifecycle: Arc::new(Lifecycle::new()),
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Registers a handler as `scope/object`.
    pub async fn register(
        &self,
        scope: &str,
        object: &str,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<(), PanelError> {
        self.registry.write().await.register(scope, object, handler)
    }

    /// Last request/response record of an endpoint.
    pub async fn exchange(&self, scope: &str, object: &str) -> Option<Exchange> {
        let endpoint = self.registry.read().await.get(scope, object)?;
        Some(endpoint.exchange().await)
    }

    /// Invokes `scope/object` with an optional call-time argument.
    ///
    /// The request is built from the handler's data segment followed by
    /// `arg`, then gated by `on_precall`. An accepted request runs on its
    /// own task; this method returns as soon as it is spawned. Overlapping
    /// calls to the same action are not serialized.
    pub async fn call(
        &self,
        scope: &str,
        object: &str,
        arg: Option<&str>,
    ) -> Result<CallOutcome, PanelError> {
        let endpoint = self
            .registry
            .read()
            .await
            .get(scope, object)
            .ok_or_else(|| PanelError::UnknownEndpoint {
                scope: scope.to_string(),
                object: object.to_string(),
            })?;
        let handler = endpoint.handler();

        let data = handler.data().await;
        let request = build_request(scope, object, &[data.as_deref(), arg]);
        endpoint.begin(&request).await;
        debug!("Making request: {}", request);

        let ctx = CallContext {
            dispatcher: self.clone(),
            request: request.clone(),
        };
        if !handler.on_precall(&ctx).await {
            debug!("Request blocked by pre-call gate: {}", request);
            return Ok(CallOutcome::Blocked);
        }

        let dispatcher = self.clone();
        let handle = tokio::spawn(async move {
            match dispatcher.transport.get(&request).await {
                Ok(response) => dispatcher.complete(&request, response).await,
                Err(e) => warn!("Request {} failed: {}", request, e),
            }
        });
        Ok(CallOutcome::Dispatched(handle))
    }

    /// Routes a response to the hooks of the endpoint its URL names.
    async fn complete(&self, request: &str, response: ApiResponse) {
        let requester = self.registry.read().await.requester(&response.url);
        let Some(endpoint) = requester else {
            warn!(
                "No endpoint registered for response {} (request {})",
                response.url, request
            );
            return;
        };
        endpoint.finish(response.status, &response.body).await;

        let handler = endpoint.handler();
        let ctx = CallContext {
            dispatcher: self.clone(),
            request: request.to_string(),
        };

        handler.on_complete(&ctx, &response).await;
        match StatusClass::from_code(response.status) {
            Some(StatusClass::Success) => handler.on_success(&ctx, &response).await,
            Some(StatusClass::Redirect) => handler.on_redirect(&ctx, &response).await,
            Some(StatusClass::ClientError) => handler.on_client_error(&ctx, &response).await,
            Some(StatusClass::ServerError) => {
                warn!("Server error for API call {}: {}", request, response.status);
                handler.on_server_error(&ctx, &response).await
            }
            None => warn!("Invalid response for {}: {}", request, response.status),
        }
    }

    /// Re-invokes `scope/object` every `period` until the task is aborted.
    ///
    /// Calls are issued regardless of whether the previous one finished.
    pub fn spawn_poll(&self, scope: &str, object: &str, period: Duration) -> JoinHandle<()> {
        let dispatcher = self.clone();
        let scope = scope.to_string();
        let object = object.to_string();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(start, period);
            loop {
                interval.tick().await;
                if let Err(e) = dispatcher.call(&scope, &object, None).await {
                    warn!("Poll of {}/{} failed: {}", scope, object, e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Transport that answers every GET with a fixed status.
    struct FixedStatus(u16);

    #[async_trait]
    impl HttpTransport for FixedStatus {
        async fn get(&self, path: &str) -> Result<ApiResponse, PanelError> {
            Ok(ApiResponse {
                url: format!("http://panel.test{path}"),
                status: self.0,
                body: String::new(),
            })
        }
    }

    /// Transport whose every GET fails before a response arrives.
    struct Unreachable;

    #[async_trait]
    impl HttpTransport for Unreachable {
        async fn get(&self, _path: &str) -> Result<ApiResponse, PanelError> {
            Err(PanelError::Transport("connection refused".into()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        hooks: Mutex<Vec<&'static str>>,
    }

    impl Recorder {
        fn push(&self, hook: &'static str) {
            self.hooks.lock().unwrap().push(hook);
        }

        fn hooks(&self) -> Vec<&'static str> {
            self.hooks.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RequestHandler for Recorder {
        async fn on_complete(&self, _ctx: &CallContext, _response: &ApiResponse) {
            self.push("complete");
        }
        async fn on_success(&self, _ctx: &CallContext, _response: &ApiResponse) {
            self.push("success");
        }
        async fn on_redirect(&self, _ctx: &CallContext, _response: &ApiResponse) {
            self.push("redirect");
        }
        async fn on_client_error(&self, _ctx: &CallContext, _response: &ApiResponse) {
            self.push("client_error");
        }
        async fn on_server_error(&self, _ctx: &CallContext, _response: &ApiResponse) {
            self.push("server_error");
        }
    }

    async fn dispatch_with_status(status: u16) -> Vec<&'static str> {
        let dispatcher = ApiDispatcher::new(Arc::new(FixedStatus(status)));
        let recorder = Arc::new(Recorder::default());
        dispatcher
            .register("player", "kick", recorder.clone())
            .await
            .unwrap();
        dispatcher.lifecycle().mark_ready();

        let outcome = dispatcher.call("player", "kick", Some("Alice")).await.unwrap();
        assert!(outcome.finished().await);
        recorder.hooks()
    }

    #[tokio::test]
    async fn test_not_found_fires_only_client_error() {
        assert_eq!(dispatch_with_status(404).await, vec!["complete", "client_error"]);
    }

    #[tokio::test]
    async fn test_each_status_class_selects_one_hook() {
        assert_eq!(dispatch_with_status(204).await, vec!["complete", "success"]);
        assert_eq!(dispatch_with_status(301).await, vec!["complete", "redirect"]);
        assert_eq!(dispatch_with_status(502).await, vec!["complete", "server_error"]);
        assert_eq!(dispatch_with_status(99).await, vec!["complete"]);
    }

    #[tokio::test]
    async fn test_calls_blocked_until_ready() {
        let dispatcher = ApiDispatcher::new(Arc::new(FixedStatus(200)));
        let recorder = Arc::new(Recorder::default());
        dispatcher
            .register("server", "stop", recorder.clone())
            .await
            .unwrap();

        let outcome = dispatcher.call("server", "stop", None).await.unwrap();
        assert!(outcome.is_blocked());
        assert!(recorder.hooks().is_empty());

        // The request URL is still recorded for a blocked call
        let exchange = dispatcher.exchange("server", "stop").await.unwrap();
        assert_eq!(exchange.request.as_deref(), Some("/api/server/stop/"));
        assert_eq!(exchange.status, None);
    }

    #[tokio::test]
    async fn test_unknown_endpoint_is_an_error() {
        let dispatcher = ApiDispatcher::new(Arc::new(FixedStatus(200)));
        dispatcher.lifecycle().mark_ready();
        let err = dispatcher.call("server", "explode", None).await.unwrap_err();
        assert!(matches!(err, PanelError::UnknownEndpoint { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_fires_no_hooks() {
        let dispatcher = ApiDispatcher::new(Arc::new(Unreachable));
        let recorder = Arc::new(Recorder::default());
        dispatcher
            .register("server", "restart", recorder.clone())
            .await
            .unwrap();
        dispatcher.lifecycle().mark_ready();

        let outcome = dispatcher.call("server", "restart", None).await.unwrap();
        assert!(outcome.finished().await);
        assert!(recorder.hooks().is_empty());

        let exchange = dispatcher.exchange("server", "restart").await.unwrap();
        assert_eq!(exchange.request.as_deref(), Some("/api/server/restart/"));
        assert_eq!(exchange.status, None);
        assert_eq!(exchange.body, None);
    }
}
