//! API dispatch for the administration backend.
//!
//! Every remote action is addressed by a scope and an object name and is
//! reached with a plain GET on `/api/<scope>/<object>/<args...>`. State travels
//! only in path segments: there is no query string and no body.
//!
//! The pieces:
//!
//! * [`RequestHandler`] - per-action hooks with default behaviour
//! * [`EndpointRegistry`] - the scope → object → handler map
//! * [`HttpTransport`] - how a GET reaches the server
//! * [`ApiDispatcher`] - builds requests, gates them, spawns them and routes
//!   completions back to the right hooks

pub mod dispatcher;
pub mod handler;
pub mod registry;
pub mod transport;

pub use dispatcher::{ApiDispatcher, CallContext, CallOutcome};
pub use handler::{Lifecycle, RequestHandler};
pub use registry::{EndpointRegistry, Exchange};
pub use transport::{ApiResponse, HttpTransport, ReqwestTransport};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Fixed prefix under which every API endpoint lives
pub const API_PREFIX: &str = "/api/";

/// Scopes the panel registry is built with
pub const SCOPES: [&str; 3] = ["server", "player", "ajax"];

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Builds the request path for an action.
///
/// Absent arguments are skipped; present ones are percent-encoded and joined
/// with `/` after the `scope/object/` stem.
///
/// ```
/// use panel_core::api::build_request;
///
/// assert_eq!(build_request("player", "kick", &[Some("Alice")]), "/api/player/kick/Alice");
/// assert_eq!(build_request("ajax", "fullstatus", &[None, None]), "/api/ajax/fullstatus/");
/// ```
pub fn build_request(scope: &str, object: &str, args: &[Option<&str>]) -> String {
    let mut request = format!("{API_PREFIX}{scope}/{object}/");
    let segments: Vec<String> = args
        .iter()
        .flatten()
        .map(|arg| utf8_percent_encode(arg, SEGMENT).to_string())
        .collect();
    request.push_str(&segments.join("/"));
    request
}

/// Recovers the scope and object from a request or response URL.
///
/// Accepts a bare path or an absolute URL and looks for the first
/// `/api/<scope>/<object>/` run in it. Returns `None` when the URL does not
/// address an endpoint.
pub fn parse_requester(url: &str) -> Option<(&str, &str)> {
    let start = url.find(API_PREFIX)? + API_PREFIX.len();
    let mut parts = url[start..].splitn(3, '/');
    let scope = parts.next().filter(|s| !s.is_empty())?;
    let object = parts.next().filter(|o| !o.is_empty())?;
    // The object must be closed by a slash, otherwise this is not an endpoint path
    parts.next()?;
    Some((scope, object))
}

/// HTTP status ranges that select a response hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200-299
    Success,
    /// 300-399
    Redirect,
    /// 400-499
    ClientError,
    /// 500-599
    ServerError,
}

impl StatusClass {
    /// Classifies a status code, or `None` when it falls outside 200-599.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200..=299 => Some(Self::Success),
            300..=399 => Some(Self::Redirect),
            400..=499 => Some(Self::ClientError),
            500..=599 => Some(Self::ServerError),
            _ => None,
        }
    }
}
