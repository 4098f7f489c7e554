// Tool-call transport for the Spark History bridge

pub mod bridge;
pub mod error;
pub mod session;
pub mod transport;

pub use bridge::{BridgeClient, DEFAULT_BRIDGE_URL, DEFAULT_TIMEOUT_SECS, decode_call_response};
pub use error::{Error, Result};
pub use session::{Outcome, ToolSession};
pub use transport::{BridgeStatus, RemoteTool, ToolTransport};
