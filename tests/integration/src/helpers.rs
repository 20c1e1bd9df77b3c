//! Test helpers: temporary log directory and a scripted mock gateway

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chat_audit_common::GatewayConfig;
use chat_audit_core::{LogIdentity, Snowflake};
use chat_audit_gateway::{GatewayClient, SnapshotCache};
use chat_audit_service::EventAdapter;
use chat_audit_store::{JsonLogRepository, LogLayout};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;

/// Token the mock gateway expects in Identify
pub const TEST_TOKEN: &str = "test-token";

/// Upper bound for any single mock gateway exchange
const STEP_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// Log directory
// ============================================================================

/// Log directory that disappears with the test
pub struct TestLogs {
    dir: TempDir,
    layout: LogLayout,
}

impl TestLogs {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        let layout = LogLayout::new(dir.path());
        Ok(Self { dir, layout })
    }

    pub fn layout(&self) -> &LogLayout {
        &self.layout
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn repository(&self) -> JsonLogRepository {
        JsonLogRepository::new(self.layout.clone())
    }

    pub fn adapter(&self) -> EventAdapter {
        EventAdapter::new(Arc::new(self.repository()))
    }

    /// Parsed log file, `None` if it was never written
    pub fn read(&self, identity: LogIdentity) -> Result<Option<Value>> {
        let path = self.layout.path_for(identity);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub fn guild(&self, id: u64) -> Result<Value> {
        self.read(LogIdentity::Guild(Snowflake::new(id)))?
            .ok_or_else(|| anyhow!("no log for guild {id}"))
    }

    pub fn direct(&self, recipient_id: u64) -> Result<Value> {
        self.read(LogIdentity::Direct(Snowflake::new(recipient_id)))?
            .ok_or_else(|| anyhow!("no log for direct messages with {recipient_id}"))
    }

    /// The `type` label of every record in a log, in order
    pub fn record_types(log: &Value) -> Vec<String> {
        log["events"]
            .as_array()
            .map(|events| {
                events
                    .iter()
                    .filter_map(|e| e["type"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// Mock gateway
// ============================================================================

/// One step of the mock gateway's script
#[derive(Debug, Clone)]
pub enum Step {
    /// Send a frame to the client
    Send(Value),
    /// Read client frames until one with this op code arrives
    Expect(u8),
    /// Close the connection with a close code
    Close(u16),
}

impl Step {
    /// Dispatch frame with a sequence number
    pub fn dispatch(event: &str, seq: u64, data: Value) -> Self {
        Self::Send(json!({"op": 0, "t": event, "s": seq, "d": data}))
    }

    pub fn reconnect() -> Self {
        Self::Send(json!({"op": 7, "d": null}))
    }

    pub fn heartbeat_request() -> Self {
        Self::Send(json!({"op": 1, "d": null}))
    }
}

/// Single-connection gateway that sends Hello and then plays a script
pub struct MockGateway {
    addr: SocketAddr,
    handle: JoinHandle<Result<Vec<Value>>>,
}

impl MockGateway {
    pub async fn start(script: Vec<Step>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await?;
            let mut socket = tokio_tungstenite::accept_async(stream).await?;
            let mut received = Vec::new();

            let hello = json!({"op": 10, "d": {"heartbeat_interval": 45_000}});
            socket.send(Message::Text(hello.to_string())).await?;

            for step in script {
                match step {
                    Step::Send(frame) => socket.send(Message::Text(frame.to_string())).await?,
                    Step::Expect(op) => loop {
                        let frame = tokio::time::timeout(STEP_TIMEOUT, socket.next())
                            .await
                            .context("client went quiet")?
                            .ok_or_else(|| anyhow!("client disconnected"))??;
                        if let Message::Text(text) = frame {
                            let value: Value = serde_json::from_str(&text)?;
                            let matched = value["op"] == op;
                            received.push(value);
                            if matched {
                                break;
                            }
                        }
                    },
                    Step::Close(code) => {
                        let frame = CloseFrame {
                            code: CloseCode::from(code),
                            reason: "".into(),
                        };
                        socket.send(Message::Close(Some(frame))).await?;
                    }
                }
            }

            // Let the client see the last frame before the socket drops
            let _ = tokio::time::timeout(STEP_TIMEOUT, socket.next()).await;
            Ok::<_, anyhow::Error>(received)
        });

        Ok(Self { addr, handle })
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn config(&self) -> GatewayConfig {
        GatewayConfig {
            url: self.url(),
            token: TEST_TOKEN.to_string(),
        }
    }

    /// Client for this gateway writing into `logs`
    pub fn client(&self, logs: &TestLogs) -> GatewayClient {
        GatewayClient::new(self.config(), Arc::new(SnapshotCache::new(100)), logs.adapter())
    }

    /// Frames the client sent while the script ran
    pub async fn finish(self) -> Result<Vec<Value>> {
        tokio::time::timeout(STEP_TIMEOUT, self.handle)
            .await
            .context("mock gateway did not finish")??
    }
}
