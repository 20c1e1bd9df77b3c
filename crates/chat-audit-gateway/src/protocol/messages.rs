//! Gateway frame format

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{HelloPayload, IdentifyPayload, OpCode};

/// One frame on the gateway connection: `{ "op", "d", "s", "t" }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event name, dispatch only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number, dispatch only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Always present on the wire, even when null
    #[serde(default)]
    pub d: Value,
}

impl GatewayMessage {
    // === Client Frames ===

    /// Op 1, carrying the last sequence number seen
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            op: OpCode::Heartbeat,
            t: None,
            s: None,
            d: last_sequence.map_or(Value::Null, Value::from),
        }
    }

    /// Op 2
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            op: OpCode::Identify,
            t: None,
            s: None,
            d: serde_json::to_value(payload)?,
        })
    }

    // === Server Frames ===

    /// Heartbeat interval, if this is op 10
    pub fn as_hello(&self) -> Option<HelloPayload> {
        if self.op != OpCode::Hello {
            return None;
        }
        serde_json::from_value(self.d.clone()).ok()
    }

    /// Event name and payload, if this is a dispatch
    pub fn as_dispatch(&self) -> Option<(&str, &Value)> {
        if self.op != OpCode::Dispatch {
            return None;
        }
        self.t.as_deref().map(|t| (t, &self.d))
    }

    /// Whether an invalidated session could be resumed (op 9)
    pub fn is_resumable(&self) -> bool {
        self.op == OpCode::InvalidSession && self.d.as_bool().unwrap_or(false)
    }

    // === Utilities ===

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.t, self.s) {
            (Some(t), Some(s)) => write!(f, "GatewayMessage(op={}, t={t}, s={s})", self.op),
            (Some(t), None) => write!(f, "GatewayMessage(op={}, t={t})", self.op),
            _ => write!(f, "GatewayMessage(op={})", self.op),
        }
    }
}
