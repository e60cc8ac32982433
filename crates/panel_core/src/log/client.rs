//! WebSocket client for the live server log.
//!
//! One connection per session. There is no reconnect: when the socket
//! closes, a "Connection closed." notice is appended and the client returns.

use super::{classify_line, LogItem};
use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

/// Notice appended when the socket closes or cannot be opened
pub const CONNECTION_CLOSED: &str = "Connection closed.";

/// Notice appended when the server address cannot carry a WebSocket
pub const SOCKETS_UNSUPPORTED: &str = "This server address does not support WebSockets.";

/// Destination for log items produced by the client.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn append(&self, item: LogItem);
}

#[async_trait]
impl LogSink for mpsc::UnboundedSender<LogItem> {
    async fn append(&self, item: LogItem) {
        if self.send(item).is_err() {
            debug!("Log receiver dropped, discarding item");
        }
    }
}

/// Derives the log socket URL (`/ws` on the same host) from the server URL.
///
/// `http` maps to `ws` and `https` to `wss`; socket schemes are kept. Any
/// other scheme has no socket counterpart and yields `None`.
pub fn websocket_url(base: &Url) -> Option<Url> {
    let scheme = match base.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return None,
    };
    let host = base.host_str()?;
    let mut url = Url::parse(&format!("{scheme}://{host}/ws")).ok()?;
    url.set_port(base.port()).ok()?;
    Some(url)
}

/// Streams the server log into a [`LogSink`].
#[derive(Debug, Clone)]
pub struct LiveLogClient {
    base_url: Url,
}

impl LiveLogClient {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Connects and forwards every received line until the socket closes.
    ///
    /// Returns the number of log entries appended, notices excluded.
    pub async fn run<S>(&self, sink: &S) -> usize
    where
        S: LogSink + ?Sized,
    {
        let Some(url) = websocket_url(&self.base_url) else {
            warn!("No WebSocket endpoint for {}", self.base_url);
            sink.append(LogItem::Notice(SOCKETS_UNSUPPORTED.to_string()))
                .await;
            return 0;
        };

        info!("🔌 Connecting to log feed {}", url);
        let mut stream = match connect_async(url.as_str()).await {
            Ok((stream, _response)) => stream,
            Err(e) => {
                warn!("Log feed connection to {} failed: {}", url, e);
                sink.append(LogItem::Notice(CONNECTION_CLOSED.to_string()))
                    .await;
                return 0;
            }
        };

        let mut count = 0;
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    count += render_frame(text.as_str(), sink).await;
                }
                Ok(Message::Binary(data)) => {
                    count += render_frame(&String::from_utf8_lossy(&data), sink).await;
                }
                Ok(Message::Close(frame)) => {
                    debug!("Log feed closed by server: {:?}", frame);
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("Log feed error: {}", e);
                    break;
                }
            }
        }

        info!("Log feed closed after {} lines", count);
        sink.append(LogItem::Notice(CONNECTION_CLOSED.to_string()))
            .await;
        count
    }
}

/// Appends one entry per newline-separated line of a frame.
async fn render_frame<S>(payload: &str, sink: &S) -> usize
where
    S: LogSink + ?Sized,
{
    let mut count = 0;
    for line in payload.split('\n') {
        sink.append(classify_line(line).into()).await;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url_follows_scheme() {
        let plain = Url::parse("http://127.0.0.1:8080/admin").unwrap();
        assert_eq!(
            websocket_url(&plain).unwrap().as_str(),
            "ws://127.0.0.1:8080/ws"
        );

        let secure = Url::parse("https://panel.example.org").unwrap();
        assert_eq!(
            websocket_url(&secure).unwrap().as_str(),
            "wss://panel.example.org/ws"
        );

        let ipv6 = Url::parse("http://[::1]:9000/").unwrap();
        assert_eq!(websocket_url(&ipv6).unwrap().as_str(), "ws://[::1]:9000/ws");
    }

    #[test]
    fn test_websocket_url_unsupported_scheme() {
        let file = Url::parse("file:///srv/game").unwrap();
        assert!(websocket_url(&file).is_none());
    }

    #[tokio::test]
    async fn test_unsupported_address_appends_notice() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = LiveLogClient::new(Url::parse("ftp://game.example").unwrap());
        assert_eq!(client.run(&tx).await, 0);
        assert_eq!(
            rx.recv().await,
            Some(LogItem::Notice(SOCKETS_UNSUPPORTED.to_string()))
        );
    }

    #[tokio::test]
    async fn test_render_frame_splits_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let count = render_frame("[WARN] a\n[CHAT] <Bob> hi\nplain", &tx).await;
        assert_eq!(count, 3);
        drop(tx);

        let mut texts = Vec::new();
        while let Some(LogItem::Entry(entry)) = rx.recv().await {
            texts.push(entry.text);
        }
        assert_eq!(texts, vec!["a", "hi", "plain"]);
    }
}
