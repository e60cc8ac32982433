//! Endpoint registry: scope → object → handler.

use super::handler::RequestHandler;
use crate::error::PanelError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// Request/response record kept per endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exchange {
    /// URL of the most recent call
    pub request: Option<String>,
    /// URL of the call before that
    pub last_request: Option<String>,
    /// Status of the most recent completed response
    pub status: Option<u16>,
    /// Body of the most recent completed response
    pub body: Option<String>,
}

/// One registered remote action.
pub struct Endpoint {
    scope: String,
    object: String,
    handler: Arc<dyn RequestHandler>,
    exchange: Mutex<Exchange>,
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("scope", &self.scope)
            .field("object", &self.object)
            .field("handler", &"[handler]")
            .finish()
    }
}

impl Endpoint {
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn handler(&self) -> Arc<dyn RequestHandler> {
        self.handler.clone()
    }

    /// Snapshot of the endpoint's last exchange.
    pub async fn exchange(&self) -> Exchange {
        self.exchange.lock().await.clone()
    }

    /// Rotates the current request into `last_request` and records `request`.
    pub(crate) async fn begin(&self, request: &str) {
        let mut exchange = self.exchange.lock().await;
        if let Some(previous) = exchange.request.take() {
            exchange.last_request = Some(previous);
        }
        exchange.request = Some(request.to_string());
    }

    pub(crate) async fn finish(&self, status: u16, body: &str) {
        let mut exchange = self.exchange.lock().await;
        exchange.status = Some(status);
        exchange.body = Some(body.to_string());
    }
}

/// Two-level map of registered endpoints.
///
/// Scopes are fixed when the registry is built; objects are only ever added.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    scopes: HashMap<String, HashMap<String, Arc<Endpoint>>>,
}

impl EndpointRegistry {
    /// Creates a registry that accepts registrations under `scopes`.
    pub fn with_scopes<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes
                .into_iter()
                .map(|scope| (scope.into(), HashMap::new()))
                .collect(),
        }
    }

    /// Registers `handler` as `scope/object`, replacing any previous handler.
    pub fn register(
        &mut self,
        scope: &str,
        object: &str,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<(), PanelError> {
        let Some(objects) = self.scopes.get_mut(scope) else {
            warn!("RegisterEndpoint: Invalid scope: {}", scope);
            return Err(PanelError::InvalidScope(scope.to_string()));
        };

        objects.insert(
            object.to_string(),
            Arc::new(Endpoint {
                scope: scope.to_string(),
                object: object.to_string(),
                handler,
                exchange: Mutex::new(Exchange::default()),
            }),
        );
        Ok(())
    }

    /// Looks up an endpoint by name.
    pub fn get(&self, scope: &str, object: &str) -> Option<Arc<Endpoint>> {
        self.scopes.get(scope)?.get(object).cloned()
    }

    /// Finds the endpoint a request or response URL belongs to.
    pub fn requester(&self, url: &str) -> Option<Arc<Endpoint>> {
        let (scope, object) = super::parse_requester(url)?;
        self.get(scope, object)
    }

    /// Number of registered endpoints across all scopes.
    pub fn len(&self) -> usize {
        self.scopes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
