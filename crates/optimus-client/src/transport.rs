use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool advertised by the bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeStatus {
    #[serde(default)]
    pub connected: bool,
}

/// Anything that can invoke named tools and hand back their JSON payload.
#[async_trait]
pub trait ToolTransport: Send + Sync {
    /// Invoke `name` with `arguments`. `Ok(Value::Null)` means the tool
    /// returned nothing.
    async fn invoke(&self, name: &str, arguments: &Map<String, Value>) -> Result<Value>;

    async fn list_tools(&self) -> Result<Vec<RemoteTool>>;

    async fn status(&self) -> Result<BridgeStatus>;
}
