//! Gateway session

use chat_audit_common::GatewayConfig;
use chat_audit_service::EventAdapter;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::router::{log_join, EventRouter};
use super::Heartbeat;
use crate::cache::SnapshotCache;
use crate::error::{GatewayError, GatewayResult};
use crate::handlers::DispatchHandler;
use crate::protocol::{CloseCode, GatewayMessage, HelloPayload, IdentifyPayload, Intents, OpCode};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<Socket, Message>;
type WsStream = SplitStream<Socket>;

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The connection closed, with the close code if one was sent
    Closed(Option<u16>),
    /// The gateway sent Reconnect
    ReconnectRequested,
    /// The gateway sent Invalid Session
    InvalidSession { resumable: bool },
    /// A heartbeat went unacknowledged
    Zombied,
    /// Shutdown was requested locally
    Shutdown,
}

impl SessionEnd {
    pub fn close_code(&self) -> Option<CloseCode> {
        match self {
            Self::Closed(Some(code)) => CloseCode::from_u16(*code),
            _ => None,
        }
    }

    /// Whether a new session would fail the same way
    pub fn is_fatal(&self) -> bool {
        self.close_code().is_some_and(CloseCode::is_fatal)
    }
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed(None) => f.write_str("connection closed"),
            Self::Closed(Some(code)) => match CloseCode::from_u16(*code) {
                Some(known) => write!(f, "connection closed: {known}"),
                None => write!(f, "connection closed with code {code}"),
            },
            Self::ReconnectRequested => f.write_str("gateway requested a reconnect"),
            Self::InvalidSession { resumable } => {
                write!(f, "session invalidated (resumable: {resumable})")
            }
            Self::Zombied => f.write_str("heartbeat not acknowledged"),
            Self::Shutdown => f.write_str("shutdown requested"),
        }
    }
}

/// Receive-only gateway client feeding the audit pipeline
///
/// Events for one log are written in the order their dispatches arrived;
/// different logs are written concurrently. When the session ends, queued
/// events are written before `run` returns.
pub struct GatewayClient {
    config: GatewayConfig,
    intents: Intents,
    handler: DispatchHandler,
    adapter: EventAdapter,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig, cache: Arc<SnapshotCache>, adapter: EventAdapter) -> Self {
        Self {
            config,
            intents: Intents::default(),
            handler: DispatchHandler::new(cache),
            adapter,
        }
    }

    pub fn cache(&self) -> &Arc<SnapshotCache> {
        self.handler.cache()
    }

    /// Run one session until the gateway ends it
    pub async fn run(&self) -> GatewayResult<SessionEnd> {
        self.run_until(std::future::pending()).await
    }

    /// Run one session until the gateway ends it or `shutdown` completes
    pub async fn run_until<F>(&self, shutdown: F) -> GatewayResult<SessionEnd>
    where
        F: Future<Output = ()>,
    {
        info!(url = %self.config.url, intents = self.intents.bits(), "Connecting to gateway");
        let (socket, _response) = connect_async(self.config.url.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let hello = match wait_for_hello(&mut stream).await? {
            Ok(hello) => hello,
            Err(end) => return Ok(end),
        };
        debug!(interval_ms = hello.heartbeat_interval, "Hello received");

        let identify = IdentifyPayload::new(self.config.token.clone(), self.intents);
        send(&mut sink, &GatewayMessage::identify(&identify)?).await?;

        let mut router = EventRouter::new(self.adapter.clone());
        let heartbeat = Heartbeat::new(Duration::from_millis(hello.heartbeat_interval));
        let result = self
            .event_loop(&mut sink, &mut stream, heartbeat, &mut router, shutdown)
            .await;

        router.finish().await;
        let _ = sink.close().await;

        result
    }

    async fn event_loop<F>(
        &self,
        sink: &mut WsSink,
        stream: &mut WsStream,
        mut heartbeat: Heartbeat,
        router: &mut EventRouter,
        shutdown: F,
    ) -> GatewayResult<SessionEnd>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut sequence: Option<u64> = None;

        loop {
            tokio::select! {
                () = &mut shutdown => return Ok(SessionEnd::Shutdown),
                () = heartbeat.tick() => {
                    if !heartbeat.beat() {
                        warn!("Heartbeat not acknowledged");
                        return Ok(SessionEnd::Zombied);
                    }
                    send(sink, &GatewayMessage::heartbeat(sequence)).await?;
                }
                Some(joined) = router.join_next(), if router.has_workers() => log_join(joined),
                frame = stream.next() => {
                    let text = match frame {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Close(frame))) => {
                            return Ok(SessionEnd::Closed(frame.map(|f| u16::from(f.code))));
                        }
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Err(e.into()),
                        None => return Ok(SessionEnd::Closed(None)),
                    };

                    let message = match GatewayMessage::from_json(&text) {
                        Ok(message) => message,
                        Err(e) => {
                            warn!(error = %e, "Skipping undecodable frame");
                            continue;
                        }
                    };

                    match message.op {
                        OpCode::Dispatch => {
                            if message.s.is_some() {
                                sequence = message.s;
                            }
                            if let Some((name, data)) = message.as_dispatch() {
                                self.dispatch(name, data, router);
                            }
                        }
                        OpCode::Heartbeat => {
                            send(sink, &GatewayMessage::heartbeat(sequence)).await?;
                        }
                        OpCode::HeartbeatAck => heartbeat.ack(),
                        OpCode::Reconnect => return Ok(SessionEnd::ReconnectRequested),
                        OpCode::InvalidSession => {
                            return Ok(SessionEnd::InvalidSession {
                                resumable: message.is_resumable(),
                            });
                        }
                        OpCode::Hello | OpCode::Identify | OpCode::Resume => {
                            debug!(op = %message.op, "Ignoring unexpected op");
                        }
                    }
                }
            }
        }
    }

    /// Apply a dispatch to the cache and queue the resulting events
    fn dispatch(&self, name: &str, data: &Value, router: &mut EventRouter) {
        let events = match self.handler.handle(name, data) {
            Ok(events) => events,
            Err(e) => {
                error!(event = name, code = e.code(), error = %e, "Dispatch dropped");
                return;
            }
        };

        for event in events {
            router.route(event);
        }
    }
}

/// Read frames until Hello arrives
///
/// `Ok(Err(end))` when the gateway closed the connection first.
async fn wait_for_hello(stream: &mut WsStream) -> GatewayResult<Result<HelloPayload, SessionEnd>> {
    loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                let message = GatewayMessage::from_json(&text)?;
                return message
                    .as_hello()
                    .map(Ok)
                    .ok_or_else(|| GatewayError::handshake(format!("expected Hello, got {message}")));
            }
            Some(Ok(Message::Close(frame))) => {
                return Ok(Err(SessionEnd::Closed(frame.map(|f| u16::from(f.code)))));
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => return Err(e.into()),
            None => return Err(GatewayError::handshake("connection closed before Hello")),
        }
    }
}

async fn send(sink: &mut WsSink, message: &GatewayMessage) -> GatewayResult<()> {
    sink.send(Message::Text(message.to_json()?)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_end_fatality() {
        assert!(SessionEnd::Closed(Some(4004)).is_fatal());
        assert!(SessionEnd::Closed(Some(4014)).is_fatal());
        assert!(!SessionEnd::Closed(Some(4000)).is_fatal());
        assert!(!SessionEnd::Closed(Some(1000)).is_fatal());
        assert!(!SessionEnd::ReconnectRequested.is_fatal());
        assert!(!SessionEnd::Zombied.is_fatal());
    }

    #[test]
    fn test_session_end_display() {
        assert_eq!(
            SessionEnd::Closed(Some(4004)).to_string(),
            "connection closed: Authentication failed, check the bot token (4004)"
        );
        assert_eq!(
            SessionEnd::Closed(Some(1000)).to_string(),
            "connection closed with code 1000"
        );
        assert_eq!(
            SessionEnd::InvalidSession { resumable: false }.to_string(),
            "session invalidated (resumable: false)"
        );
    }
}
