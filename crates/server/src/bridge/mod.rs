//! Message contract between the dashboard side and the background bridge.
//!
//! The dashboard side never talks to the network itself; every fetch goes
//! through this typed request/response union, serviced by the privileged
//! bridge task. Each request receives at most one response.

pub mod service;

pub use service::{BridgeHandle, spawn};

use serde::{Deserialize, Serialize};

/// Requests the dashboard side may send to the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BridgeRequest {
    /// Liveness check, answered immediately.
    Ping,
    /// Fetch `url` and return the payload as an inline `data:` URL.
    FetchFavicon { url: String },
    /// Probe general network reachability.
    TestNetwork,
}

/// Response to a bridge request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeResponse {
    pub success: bool,

    #[serde(rename = "dataUrl", skip_serializing_if = "Option::is_none", default)]
    pub data_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl BridgeResponse {
    pub fn ok() -> Self {
        Self { success: true, data_url: None, error: None }
    }

    pub fn with_data(data_url: String) -> Self {
        Self { success: true, data_url: Some(data_url), error: None }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self { success: false, data_url: None, error: Some(message.into()) }
    }
}
